//! 上传文件路径构建
//!
//! 根据场景、原始文件名和可选的子路径，校验文件类型并生成不冲突的对象路径。

use crate::catalog::Catalog;
use crate::error::{Error, Result};
use crate::scene::SceneType;
use crate::utils::clock::{Clock, IdGenerator, SystemClock, UuidGenerator};
use crate::utils::path::{get_extension_lowercase, normalize_path};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE;
use std::sync::Arc;

/// 待上传文件的解析结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTarget {
    /// 对象存储中的路径，不以 `/` 开头
    pub path: String,
    pub content_type: String,
    /// 是否必须以附件方式响应
    pub attachment: bool,
}

#[derive(Clone)]
pub struct PathBuilder {
    catalog: Arc<Catalog>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl PathBuilder {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self::with_sources(catalog, Arc::new(SystemClock), Arc::new(UuidGenerator))
    }

    pub fn with_sources(
        catalog: Arc<Catalog>,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self { catalog, clock, ids }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// 构建待上传文件的路径、Content-Type 以及是否必须以附件方式响应
    ///
    /// # 参数
    ///
    /// * `scene_type` - 场景类型
    /// * `filename` - 原始文件名
    /// * `segments` - 场景路径与文件名之间的子路径
    ///
    /// # 返回值
    ///
    /// 解析得到的 [`UploadTarget`]。
    ///
    /// # Errors
    ///
    /// 文件名为空、没有后缀、子路径含有 `.` 或 `..`、场景不存在、
    /// 后缀不被场景支持，或后缀没有注册 Content-Type 时返回错误。
    pub fn build_upload_target<S: AsRef<str>>(
        &self,
        scene_type: SceneType,
        filename: &str,
        segments: &[S],
    ) -> Result<UploadTarget> {
        if filename.is_empty() {
            return Err(Error::InvalidInput("filename must not be empty".to_string()));
        }
        let extension = get_extension_lowercase(filename)
            .ok_or_else(|| Error::MissingExtension(filename.to_string()))?;
        for segment in segments {
            check_segment(segment.as_ref())?;
        }

        let scene = self
            .catalog
            .scene(scene_type)
            .ok_or(Error::SceneNotFound(scene_type.0))?;

        if !scene.allows(&extension) {
            return Err(Error::UnsupportedExtension {
                scene: scene_type.0,
                extension,
            });
        }
        let attachment = scene.forces_attachment(&extension);

        let content_type = self
            .catalog
            .content_type(&extension)
            .ok_or_else(|| Error::UnknownContentType(extension.clone()))?
            .to_string();

        let unique_name = self.unique_name(filename, &extension);
        let mut parts = Vec::with_capacity(segments.len() + 2);
        parts.push(scene.path());
        parts.extend(segments.iter().map(AsRef::as_ref));
        parts.push(unique_name.as_str());
        let path = normalize_path(&parts.join("/"));

        // 对象必须落在场景路径之下
        let root = normalize_path(scene.path());
        if !root.is_empty() && !path.starts_with(&format!("{root}/")) {
            return Err(Error::InvalidInput(format!(
                "upload path escapes scene prefix `{root}`"
            )));
        }

        tracing::debug!(scene = %scene_type, %path, %content_type, attachment, "upload target resolved");

        Ok(UploadTarget {
            path,
            content_type,
            attachment,
        })
    }

    /// `<base64url(唯一标识 + 文件名)>_<纳秒时间戳>.<后缀>`
    fn unique_name(&self, filename: &str, extension: &str) -> String {
        let token = URL_SAFE.encode(format!("{}{}", self.ids.next_id(), filename));
        format!("{}_{}.{}", token, self.clock.unix_nanos(), extension)
    }
}

/// 子路径只能向下延伸，不允许 `.` 与 `..`
fn check_segment(segment: &str) -> Result<()> {
    if segment.split('/').any(|part| matches!(part.trim(), "." | "..")) {
        return Err(Error::InvalidInput(format!(
            "invalid path segment `{segment}`"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Scene;
    use crate::utils::clock::{MockClock, MockIdGenerator};

    fn catalog() -> Arc<Catalog> {
        Arc::new(
            Catalog::builder()
                .scene(Scene::new(1, "docs", ["pdf", "txt"], ["txt"]))
                .unwrap()
                .scene(Scene::new(2, "/media/images/", ["PNG", "md"], ["md"]))
                .unwrap()
                .content_type("pdf", "application/pdf")
                .unwrap()
                .content_type("png", "image/png")
                .unwrap()
                .content_type("md", "text/markdown")
                .unwrap()
                .build(),
        )
    }

    fn fixed_builder() -> PathBuilder {
        let mut clock = MockClock::new();
        clock.expect_unix_nanos().return_const(1_700_000_000_123_456_789_i128);
        let mut ids = MockIdGenerator::new();
        ids.expect_next_id().return_const("0000-id".to_string());
        PathBuilder::with_sources(catalog(), Arc::new(clock), Arc::new(ids))
    }

    const NO_SEGMENTS: &[&str] = &[];

    /// 测试构建上传路径
    #[test]
    fn test_build_upload_target_success() {
        let target = fixed_builder()
            .build_upload_target(SceneType(1), "a.pdf", NO_SEGMENTS)
            .unwrap();

        let token = URL_SAFE.encode("0000-ida.pdf");
        assert_eq!(target.content_type, "application/pdf");
        assert!(!target.attachment);
        assert_eq!(target.path, format!("docs/{token}_1700000000123456789.pdf"));
    }

    /// 测试唯一名称可以解码出原始文件名
    #[test]
    fn test_unique_token_is_traceable_to_filename() {
        let target = fixed_builder()
            .build_upload_target(SceneType(1), "report.pdf", NO_SEGMENTS)
            .unwrap();
        let name = target.path.rsplit('/').next().unwrap();
        let (token, _) = name.split_once('_').unwrap();
        let decoded = String::from_utf8(URL_SAFE.decode(token).unwrap()).unwrap();
        assert_eq!(decoded, "0000-idreport.pdf");
    }

    /// 测试带子路径时的路径拼接
    #[test]
    fn test_build_upload_target_with_segments() {
        let target = fixed_builder()
            .build_upload_target(SceneType(2), "Logo.PNG", &["user", "/42/", "43"])
            .unwrap();

        assert!(target.path.starts_with("media/images/user/42/43/"));
        assert!(target.path.ends_with("_1700000000123456789.png"));
        assert_eq!(target.content_type, "image/png");
        assert!(!target.path.contains("//"));
    }

    /// 子路径不能跳出场景路径
    #[test]
    fn test_segments_cannot_escape_scene_prefix() {
        let builder = fixed_builder();
        for segments in [
            vec![".."],
            vec!["..", "media"],
            vec!["user/../../media"],
            vec!["./user"],
            vec!["a", " .. "],
        ] {
            assert!(
                matches!(
                    builder.build_upload_target(SceneType(1), "a.pdf", segments.as_slice()),
                    Err(Error::InvalidInput(_))
                ),
                "segments: {segments:?}"
            );
        }

        let target = builder
            .build_upload_target(SceneType(1), "a.pdf", &["..2024", "v1.0"])
            .unwrap();
        assert!(target.path.starts_with("docs/..2024/v1.0/"));
    }

    /// 测试附件类型标记
    #[test]
    fn test_attachment_flag() {
        let target = fixed_builder()
            .build_upload_target(SceneType(2), "readme.md", NO_SEGMENTS)
            .unwrap();
        assert!(target.attachment);
    }

    /// 测试场景允许但没有 Content-Type 的后缀
    #[test]
    fn test_unknown_content_type_even_if_allowed() {
        let err = fixed_builder()
            .build_upload_target(SceneType(1), "a.txt", NO_SEGMENTS)
            .unwrap_err();
        assert!(matches!(err, Error::UnknownContentType(ext) if ext == "txt"));
    }

    /// 测试场景不存在
    #[test]
    fn test_scene_not_found() {
        let err = fixed_builder()
            .build_upload_target(SceneType(99), "a.pdf", NO_SEGMENTS)
            .unwrap_err();
        assert!(matches!(err, Error::SceneNotFound(99)));
    }

    /// 测试场景不支持的后缀
    #[test]
    fn test_unsupported_extension() {
        let err = fixed_builder()
            .build_upload_target(SceneType(1), "a.exe", NO_SEGMENTS)
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedExtension { scene: 1, .. }));
    }

    /// 测试空文件名与缺少后缀的文件名
    #[test]
    fn test_invalid_filenames() {
        let builder = fixed_builder();
        assert!(matches!(
            builder.build_upload_target(SceneType(1), "", NO_SEGMENTS),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            builder.build_upload_target(SceneType(1), "README", NO_SEGMENTS),
            Err(Error::MissingExtension(_))
        ));
        assert!(matches!(
            builder.build_upload_target(SceneType(1), "a.", NO_SEGMENTS),
            Err(Error::MissingExtension(_))
        ));
    }

    /// 测试只接受场景允许的后缀，大小写不敏感
    #[test]
    fn test_accepts_exactly_allowed_extensions() {
        let builder = fixed_builder();
        for (filename, accepted) in [
            ("a.pdf", true),
            ("a.PDF", true),
            ("a.Pdf", true),
            ("a.pdfx", false),
            ("a.pd", false),
            ("a.png", false),
        ] {
            let result = builder.build_upload_target(SceneType(1), filename, NO_SEGMENTS);
            assert_eq!(result.is_ok(), accepted, "filename: {filename}");
            if !accepted {
                assert!(matches!(result, Err(Error::UnsupportedExtension { .. })));
            }
        }
    }

    /// 测试默认时钟与标识来源生成不同的路径
    #[test]
    fn test_system_sources_produce_distinct_paths() {
        let builder = PathBuilder::new(catalog());
        let a = builder.build_upload_target(SceneType(1), "a.pdf", NO_SEGMENTS).unwrap();
        let b = builder.build_upload_target(SceneType(1), "a.pdf", NO_SEGMENTS).unwrap();
        assert_ne!(a.path, b.path);
        assert_eq!(normalize_path(&a.path), a.path);
    }
}
