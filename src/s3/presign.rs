//! S3预签名URL模块
//!
//! 该模块负责生成上传与访问对象的预签名URL。

use crate::error::{Error, Result};
use crate::s3::{ObjectUpload, PresignedRequest};
use aws_sdk_s3::Client;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::presigning::PresigningConfig;
use std::time::Duration;
use url::Url;

fn presigning_config(ttl: Duration) -> Result<PresigningConfig> {
    PresigningConfig::expires_in(ttl).map_err(|e| Error::SigningFailed(e.to_string()))
}

/// 生成上传对象的 PUT 预签名请求。
///
/// Content-Type 与 Content-Disposition 参与签名，返回的头部需要在上传时原样带上。
///
/// # 参数
///
/// * `client` - 携带签名密钥的 S3 客户端。
/// * `bucket` - 存储桶名称。
/// * `object` - 待上传对象。
/// * `ttl` - 预签名有效期。
pub async fn presign_put(
    client: &Client,
    bucket: &str,
    object: &ObjectUpload,
    ttl: Duration,
) -> Result<PresignedRequest> {
    let presigned = client
        .put_object()
        .bucket(bucket)
        .key(&object.path)
        .content_type(&object.content_type)
        .set_content_disposition(object.content_disposition.clone())
        .presigned(presigning_config(ttl)?)
        .await
        .map_err(|e| Error::SigningFailed(DisplayErrorContext(&e).to_string()))?;

    Ok(PresignedRequest {
        url: presigned.uri().to_string(),
        headers: presigned
            .headers()
            .map(|(name, value)| (name.to_ascii_lowercase(), value.to_string()))
            .collect(),
    })
}

/// 生成访问对象的 GET 预签名 URL。
///
/// `query` 中的参数在签名前追加到请求上，因此会一并参与签名。
///
/// # 参数
///
/// * `client` - 携带签名密钥的 S3 客户端。
/// * `bucket` - 存储桶名称。
/// * `key` - 对象路径。
/// * `query` - 额外的查询参数。
/// * `ttl` - 预签名有效期。
pub async fn presign_get(
    client: &Client,
    bucket: &str,
    key: &str,
    query: &[(String, String)],
    ttl: Duration,
) -> Result<String> {
    let query = query.to_vec();
    let presigned = client
        .get_object()
        .bucket(bucket)
        .key(key)
        .customize()
        .mutate_request(move |request| {
            if query.is_empty() {
                return;
            }
            let uri = append_query(request.uri(), &query);
            if request.set_uri(uri).is_err() {
                tracing::warn!("failed to append query parameters to presigned request");
            }
        })
        .presigned(presigning_config(ttl)?)
        .await
        .map_err(|e| Error::SigningFailed(DisplayErrorContext(&e).to_string()))?;

    Ok(presigned.uri().to_string())
}

/// 在 URI 后追加查询参数，URI 无法解析时原样返回
fn append_query(uri: &str, query: &[(String, String)]) -> String {
    match Url::parse(uri) {
        Ok(mut url) => {
            {
                let mut pairs = url.query_pairs_mut();
                for (key, value) in query {
                    pairs.append_pair(key, value);
                }
            }
            url.to_string()
        }
        Err(_) => uri.to_string(),
    }
}
