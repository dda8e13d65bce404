use http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use std::collections::BTreeMap;

/// 构建上传请求必须携带的头部
///
/// 预签名 URL 对这些头部一并签名，客户端上传时必须原样带上，否则签名校验失败。
///
/// # 参数
///
/// * `content_type` - 文件的 Content-Type
/// * `attachment_filename` - 需要以附件方式响应时的下载文件名
///
/// # 返回值
///
/// 头部名称到取值的映射
pub fn upload_headers(
    content_type: &str,
    attachment_filename: Option<&str>,
) -> BTreeMap<String, String> {
    let mut headers = BTreeMap::new();
    headers.insert(CONTENT_TYPE.as_str().to_string(), content_type.to_string());
    if let Some(filename) = attachment_filename {
        headers.insert(
            CONTENT_DISPOSITION.as_str().to_string(),
            content_disposition(filename),
        );
    }
    headers
}

/// 附件方式的 Content-Disposition 取值
pub fn content_disposition(filename: &str) -> String {
    format!("attachment; filename={filename}")
}
