/// 规范化对象路径
///
/// 按根路径语义解析 `.` 与 `..`，合并重复的斜杠，去掉末尾斜杠，
/// 最后去掉开头的斜杠。对已规范化的路径再次调用结果不变。
///
/// # 示例
///
/// ```
/// use scene_presign::utils::path::normalize_path;
///
/// assert_eq!(normalize_path("/docs//a/../b.pdf"), "docs/b.pdf");
/// assert_eq!(normalize_path("../../etc/passwd"), "etc/passwd");
/// assert_eq!(normalize_path("/"), "");
/// ```
pub fn normalize_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            // 根路径之上没有目录，多余的 `..` 直接丢弃
            ".." => {
                segments.pop();
            }
            _ => segments.push(segment),
        }
    }
    segments.join("/")
}

/// 使用正斜杠连接多个字符串组件
///
/// 自动处理组件前后的斜杠，确保结果中组件之间只有一个正斜杠，空组件会被忽略。
///
/// # 示例
///
/// ```
/// use scene_presign::utils::path::join_slash;
///
/// assert_eq!(join_slash(&["docs/", "/2024"]), "docs/2024");
/// assert_eq!(join_slash(&["docs", "", "a.pdf"]), "docs/a.pdf");
/// ```
pub fn join_slash(components: &[&str]) -> String {
    components
        .iter()
        .map(|s| s.trim_matches('/'))
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// 从文件名中获取扩展名，并转换为小写
///
/// 扩展名是最后一个路径组件中最后一个 `.` 之后的部分。
///
/// # 返回值
///
/// 小写的扩展名；没有 `.` 或 `.` 之后为空时返回 `None`。
///
/// # 示例
///
/// ```
/// use scene_presign::utils::path::get_extension_lowercase;
///
/// assert_eq!(get_extension_lowercase("file.TXT").as_deref(), Some("txt"));
/// assert_eq!(get_extension_lowercase("path/to/image.PNG").as_deref(), Some("png"));
/// assert_eq!(get_extension_lowercase("noext"), None);
/// assert_eq!(get_extension_lowercase("trailing."), None);
/// ```
pub fn get_extension_lowercase(filename: &str) -> Option<String> {
    let name = filename.rsplit('/').next().unwrap_or(filename);
    let (_, ext) = name.rsplit_once('.')?;
    if ext.is_empty() {
        return None;
    }
    Some(ext.to_lowercase())
}

/// 统一注册表中扩展名的写法：去掉空白与开头的 `.`，转换为小写
pub fn normalize_extension(extension: &str) -> String {
    extension.trim().trim_start_matches('.').to_lowercase()
}

/// 获取路径最后一个组件
pub fn base_name(path: &str) -> &str {
    path.trim_end_matches(['/', '\\'])
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 测试路径规范化
    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("docs/a.pdf"), "docs/a.pdf");
        assert_eq!(normalize_path("/docs/a.pdf"), "docs/a.pdf");
        assert_eq!(normalize_path("docs//2024///a.pdf"), "docs/2024/a.pdf");
        assert_eq!(normalize_path("docs/./a/../a.pdf"), "docs/a.pdf");
        assert_eq!(normalize_path("docs/"), "docs");
        assert_eq!(normalize_path("/../../a"), "a");
        assert_eq!(normalize_path(""), "");
        assert_eq!(normalize_path("."), "");
    }

    /// 测试路径规范化幂等
    #[test]
    fn test_normalize_path_is_idempotent() {
        let inputs = [
            "",
            "/",
            "a",
            "/a/b/",
            "//a//./b/../c",
            "../x/y/../../z",
            "docs/QUJD_1.pdf",
            "./././",
        ];
        for input in inputs {
            let once = normalize_path(input);
            assert_eq!(normalize_path(&once), once, "input: {input}");
            assert!(!once.starts_with('/'));
            assert!(!once.ends_with('/'));
            assert!(!once.contains("//"));
            assert!(!once.split('/').any(|s| s == ".." || s == "."));
        }
    }

    /// 测试斜杠拼接
    #[test]
    fn test_join_slash() {
        assert_eq!(join_slash(&["docs", "path"]), "docs/path");
        assert_eq!(join_slash(&["docs//", "//path"]), "docs/path");
        assert_eq!(join_slash(&[]), "");
        assert_eq!(join_slash(&["/", "/"]), "");
        assert_eq!(
            join_slash(&["qcs::cos:ap-guangzhou:uid/1250000000:bucket-1250000000", "docs/a.pdf"]),
            "qcs::cos:ap-guangzhou:uid/1250000000:bucket-1250000000/docs/a.pdf"
        );
    }

    /// 测试获取小写后缀
    #[test]
    fn test_get_extension_lowercase() {
        assert_eq!(get_extension_lowercase("a.PDF").as_deref(), Some("pdf"));
        assert_eq!(get_extension_lowercase("archive.tar.gz").as_deref(), Some("gz"));
        assert_eq!(get_extension_lowercase(".env").as_deref(), Some("env"));
        assert_eq!(get_extension_lowercase("dir.d/readme"), None);
        assert_eq!(get_extension_lowercase(""), None);
    }

    /// 测试后缀规范化
    #[test]
    fn test_normalize_extension() {
        assert_eq!(normalize_extension(".PNG"), "png");
        assert_eq!(normalize_extension(" txt "), "txt");
        assert_eq!(normalize_extension(""), "");
    }

    /// 测试获取文件名
    #[test]
    fn test_base_name() {
        assert_eq!(base_name("/tmp/upload/report.pdf"), "report.pdf");
        assert_eq!(base_name("report.pdf"), "report.pdf");
        assert_eq!(base_name("C:\\files\\a.txt"), "a.txt");
    }
}
