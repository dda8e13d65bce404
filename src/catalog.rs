//! 场景与 Content-Type 的只读配置
//!
//! 启动时一次性构建，之后以 `Arc<Catalog>` 共享，运行期间不再修改。

use crate::content_type::ContentTypeRegistry;
use crate::error::{Error, Result};
use crate::scene::{RegisteredScene, Scene, SceneRegistry, SceneType};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    scenes: SceneRegistry,
    content_types: ContentTypeRegistry,
}

impl Catalog {
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    pub fn scene(&self, scene_type: SceneType) -> Option<&RegisteredScene> {
        self.scenes.lookup(scene_type)
    }

    pub fn content_type(&self, extension: &str) -> Option<&str> {
        self.content_types.resolve(extension)
    }

    /// 已注册的场景数量
    pub fn scene_count(&self) -> usize {
        self.scenes.len()
    }

    /// 从 JSON 配置构建
    ///
    /// ```json
    /// {
    ///   "scenes": [{"id": 1, "path": "docs", "extensions": ["pdf"], "attachments": []}],
    ///   "content_types": {"pdf": "application/pdf"},
    ///   "guess_content_types": ["png"]
    /// }
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        let file: CatalogFile = serde_json::from_str(json)
            .map_err(|e| Error::Config(format!("invalid catalog: {e}")))?;
        file.into_catalog()
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&json)
    }
}

/// 逐项注册场景与 Content-Type，任一项非法都会立即返回错误
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    catalog: Catalog,
}

impl CatalogBuilder {
    pub fn scene(mut self, scene: Scene) -> Result<Self> {
        self.catalog.scenes.register(scene)?;
        Ok(self)
    }

    pub fn content_type(mut self, extension: &str, content_type: &str) -> Result<Self> {
        self.catalog.content_types.allow(extension, content_type)?;
        Ok(self)
    }

    pub fn guessed_content_type(mut self, extension: &str) -> Result<Self> {
        self.catalog.content_types.allow_guessed(extension)?;
        Ok(self)
    }

    pub fn build(self) -> Catalog {
        self.catalog
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    scenes: Vec<Scene>,
    #[serde(default)]
    content_types: BTreeMap<String, String>,
    #[serde(default)]
    guess_content_types: Vec<String>,
}

impl CatalogFile {
    fn into_catalog(self) -> Result<Catalog> {
        let mut builder = Catalog::builder();
        for scene in self.scenes {
            builder = builder.scene(scene)?;
        }
        for extension in &self.guess_content_types {
            builder = builder.guessed_content_type(extension)?;
        }
        // 显式配置优先于推断结果
        for (extension, content_type) in &self.content_types {
            builder = builder.content_type(extension, content_type)?;
        }
        Ok(builder.build())
    }
}
