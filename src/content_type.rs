//! 文件 Content-Type 注册表

use crate::error::{Error, Result};
use crate::utils::path::normalize_extension;
use std::collections::HashMap;

/// 支持上传的文件扩展名到 Content-Type 的映射
#[derive(Debug, Clone, Default)]
pub struct ContentTypeRegistry {
    content_types: HashMap<String, String>,
}

impl ContentTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置支持上传的文件 Content-Type
    ///
    /// # 参数
    ///
    /// * `extension` - 文件后缀，可带 `.`，大小写不敏感
    /// * `content_type` - MIME 类型
    ///
    /// # 返回值
    ///
    /// 任一参数为空时返回 [`Error::InvalidContentType`]。
    pub fn allow(&mut self, extension: &str, content_type: &str) -> Result<()> {
        let key = normalize_extension(extension);
        let content_type = content_type.trim();
        if key.is_empty() || content_type.is_empty() {
            return Err(Error::InvalidContentType {
                extension: extension.to_string(),
                content_type: content_type.to_string(),
            });
        }
        self.content_types.insert(key, content_type.to_string());
        Ok(())
    }

    /// 按 `mime_guess` 的推断结果注册 Content-Type
    pub fn allow_guessed(&mut self, extension: &str) -> Result<()> {
        let key = normalize_extension(extension);
        let guessed = mime_guess::from_ext(&key)
            .first_raw()
            .ok_or_else(|| Error::UnknownContentType(key.clone()))?;
        self.allow(&key, guessed)
    }

    pub fn resolve(&self, extension: &str) -> Option<&str> {
        self.content_types
            .get(&normalize_extension(extension))
            .map(String::as_str)
    }
}
