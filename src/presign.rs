//! 预签名 URL 门面
//!
//! 组合路径构建、签名密钥获取与对象存储签名，提供上传、访问、预览和服务端上传操作。

use crate::credentials::{AccessScope, CredentialSource};
use crate::error::{Error, Result};
use crate::path_builder::{PathBuilder, UploadTarget};
use crate::s3::{ObjectStorage, ObjectUpload};
use crate::scene::SceneType;
use crate::utils::headers::{content_disposition, upload_headers};
use crate::utils::path::{base_name, normalize_path};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// 文档预览参数，由对象存储的文档预览功能解析
pub const PREVIEW_QUERY: &[(&str, &str)] = &[
    ("ci-process", "doc-preview"),
    ("dstType", "html"),
    ("copyable", "0"),
    ("htmlwaterword", ""),
    ("htmlfillstyle", "cmdiYSgxOTIsMTkyLDE5MiwwLjYp"),
    ("htmlfront", "Ym9sZCAyMHB4IFNlcmlm"),
    ("htmlrotate", "325"),
    ("htmlhorizontal", "100"),
    ("htmlvertical", "100"),
];

/// 响应文件的方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispositionType {
    #[default]
    Inline,
    Attachment,
}

/// 上传文件预签名信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresignedInfo {
    /// 上传地址
    pub upload_url: String,
    /// 文件路径
    pub file_path: String,
    /// 上传请求头
    pub header: BTreeMap<String, String>,
}

#[derive(Clone)]
pub struct Presigner {
    paths: PathBuilder,
    credentials: Arc<dyn CredentialSource>,
    storage: Arc<dyn ObjectStorage>,
}

impl Presigner {
    pub fn new(
        paths: PathBuilder,
        credentials: Arc<dyn CredentialSource>,
        storage: Arc<dyn ObjectStorage>,
    ) -> Self {
        Self {
            paths,
            credentials,
            storage,
        }
    }

    pub fn path_builder(&self) -> &PathBuilder {
        &self.paths
    }

    /// 获取上传文件预签名URL
    ///
    /// # 参数
    ///
    /// * `scene_type` - 场景类型
    /// * `disposition` - 响应文件的方式
    /// * `filename` - 原始文件名，同时作为附件下载时的文件名
    /// * `ttl` - 预签名有效期
    /// * `segments` - 场景路径下的子路径
    ///
    /// # 返回值
    ///
    /// 上传地址、文件路径以及上传时必须携带的请求头。
    pub async fn get_upload_presigned_info<S: AsRef<str>>(
        &self,
        scene_type: SceneType,
        disposition: DispositionType,
        filename: &str,
        ttl: Duration,
        segments: &[S],
    ) -> Result<PresignedInfo> {
        let target = self.paths.build_upload_target(scene_type, filename, segments)?;
        let object = object_upload(&target, disposition, filename);

        let credentials = self
            .credentials
            .signing_credentials(&upload_scope(&target), ttl)
            .await?;

        let presigned = self.storage.presign_put(&credentials, &object, ttl).await?;

        let mut header = upload_headers(
            &target.content_type,
            object.content_disposition.as_ref().map(|_| filename),
        );
        for (name, value) in presigned.headers {
            header.entry(name).or_insert(value);
        }

        tracing::info!(scene = %scene_type, path = %target.path, "upload url presigned");
        Ok(PresignedInfo {
            upload_url: presigned.url,
            file_path: target.path,
            header,
        })
    }

    /// 获取访问文件预签名URL
    ///
    /// `query` 会与签名所需的安全令牌参数合并。
    pub async fn get_view_presigned_url(
        &self,
        path: &str,
        query: &[(String, String)],
        ttl: Duration,
    ) -> Result<String> {
        let path = normalize_path(path);
        if path.is_empty() {
            return Err(Error::InvalidInput("path must not be empty".to_string()));
        }

        let scope = AccessScope::View {
            resources: vec![path.clone()],
        };
        let credentials = self.credentials.signing_credentials(&scope, ttl).await?;

        let url = self
            .storage
            .presign_get(&credentials, &path, query, ttl)
            .await?;
        tracing::debug!(%path, "view url presigned");
        Ok(url)
    }

    /// 获取文件预览URL
    pub async fn get_preview_file_url(&self, path: &str, ttl: Duration) -> Result<String> {
        let query: Vec<(String, String)> = PREVIEW_QUERY
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        self.get_view_presigned_url(path, &query, ttl).await
    }

    /// 获取文件访问URL
    pub async fn get_file_url(&self, path: &str, ttl: Duration) -> Result<String> {
        self.get_view_presigned_url(path, &[], ttl).await
    }

    /// 上传对象
    ///
    /// # 参数
    ///
    /// * `scene_type` - 场景类型
    /// * `disposition` - 响应文件的方式
    /// * `filename` - 下载保存文件名
    /// * `body` - 待上传对象
    /// * `segments` - 场景路径下的子路径
    ///
    /// # 返回值
    ///
    /// 对象在存储中的路径。
    pub async fn put_from_object<S: AsRef<str>>(
        &self,
        scene_type: SceneType,
        disposition: DispositionType,
        filename: &str,
        body: Bytes,
        segments: &[S],
    ) -> Result<String> {
        let target = self.paths.build_upload_target(scene_type, filename, segments)?;
        let object = object_upload(&target, disposition, filename);
        let credentials = self
            .credentials
            .signing_credentials(&upload_scope(&target), DIRECT_UPLOAD_TTL)
            .await?;

        self.storage.put_object(&credentials, &object, body).await?;
        tracing::info!(scene = %scene_type, path = %target.path, "object uploaded");
        Ok(target.path)
    }

    /// 上传本地文件，文件名取本地路径的最后一段
    pub async fn put_from_file<S: AsRef<str>>(
        &self,
        scene_type: SceneType,
        disposition: DispositionType,
        local_path: &Path,
        segments: &[S],
    ) -> Result<String> {
        let local = local_path.to_string_lossy();
        let filename = base_name(&local);
        let target = self.paths.build_upload_target(scene_type, filename, segments)?;
        let object = object_upload(&target, disposition, filename);
        let credentials = self
            .credentials
            .signing_credentials(&upload_scope(&target), DIRECT_UPLOAD_TTL)
            .await?;

        self.storage.put_file(&credentials, &object, local_path).await?;
        tracing::info!(scene = %scene_type, path = %target.path, "file uploaded");
        Ok(target.path)
    }
}

/// 服务端直接上传时临时密钥的有效期
const DIRECT_UPLOAD_TTL: Duration = Duration::from_secs(1800);

fn upload_scope(target: &UploadTarget) -> AccessScope {
    AccessScope::Upload {
        resources: vec![target.path.clone()],
        content_types: vec![target.content_type.clone()],
    }
}

fn object_upload(target: &UploadTarget, disposition: DispositionType, filename: &str) -> ObjectUpload {
    let attachment = target.attachment || disposition == DispositionType::Attachment;
    ObjectUpload {
        path: target.path.clone(),
        content_type: target.content_type.clone(),
        content_disposition: attachment.then(|| content_disposition(filename)),
    }
}
