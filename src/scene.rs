//! 业务场景注册表
//!
//! 场景用于从业务上对文件的使用场景进行分类：每个场景有自己的存储路径前缀、
//! 允许上传的文件类型，以及需要作为附件响应的文件类型。

use crate::error::{Error, Result};
use crate::utils::path::normalize_extension;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// 场景类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SceneType(pub i32);

impl fmt::Display for SceneType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for SceneType {
    fn from(value: i32) -> Self {
        SceneType(value)
    }
}

/// 业务场景
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scene {
    /// 场景类型
    pub id: SceneType,
    /// 存储路径
    pub path: String,
    /// 支持上传的文件类型(文件后缀，如 txt, png)
    pub extensions: Vec<String>,
    /// 需要作为附件响应的文件类型(文件后缀，如 txt)
    #[serde(default)]
    pub attachments: Vec<String>,
}

impl Scene {
    pub fn new<E, A>(id: impl Into<SceneType>, path: impl Into<String>, extensions: E, attachments: A) -> Self
    where
        E: IntoIterator,
        E::Item: Into<String>,
        A: IntoIterator,
        A::Item: Into<String>,
    {
        Self {
            id: id.into(),
            path: path.into(),
            extensions: extensions.into_iter().map(Into::into).collect(),
            attachments: attachments.into_iter().map(Into::into).collect(),
        }
    }
}

/// 注册后的场景，扩展名已统一为小写且不带 `.`
#[derive(Debug, Clone)]
pub struct RegisteredScene {
    id: SceneType,
    path: String,
    extensions: HashSet<String>,
    attachments: HashSet<String>,
}

impl RegisteredScene {
    pub fn id(&self) -> SceneType {
        self.id
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// 扩展名是否允许上传
    pub fn allows(&self, extension: &str) -> bool {
        self.extensions.contains(extension)
    }

    /// 扩展名是否必须以附件方式响应
    pub fn forces_attachment(&self, extension: &str) -> bool {
        self.attachments.contains(extension)
    }
}

/// 场景注册表
#[derive(Debug, Clone, Default)]
pub struct SceneRegistry {
    scenes: HashMap<SceneType, RegisteredScene>,
}

impl SceneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册支持的业务场景
    ///
    /// 存储路径为空或没有任何允许的文件类型时返回 [`Error::InvalidScene`]；
    /// 同一场景类型重复注册时后者覆盖前者。
    pub fn register(&mut self, scene: Scene) -> Result<()> {
        if scene.path.trim().is_empty() {
            return Err(Error::InvalidScene {
                id: scene.id.0,
                reason: "storage path is empty",
            });
        }

        let extensions: HashSet<String> = scene
            .extensions
            .iter()
            .map(|ext| normalize_extension(ext))
            .filter(|ext| !ext.is_empty())
            .collect();
        if extensions.is_empty() {
            return Err(Error::InvalidScene {
                id: scene.id.0,
                reason: "no allowed extensions",
            });
        }

        let attachments = scene
            .attachments
            .iter()
            .map(|ext| normalize_extension(ext))
            .filter(|ext| !ext.is_empty())
            .collect();

        tracing::debug!(scene = %scene.id, path = %scene.path, "scene registered");
        self.scenes.insert(
            scene.id,
            RegisteredScene {
                id: scene.id,
                path: scene.path,
                extensions,
                attachments,
            },
        );
        Ok(())
    }

    pub fn lookup(&self, scene_type: SceneType) -> Option<&RegisteredScene> {
        self.scenes.get(&scene_type)
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }
}
