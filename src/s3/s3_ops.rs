//! S3操作模块
//!
//! 该模块基于 `aws-sdk-s3` 实现 [`ObjectStorage`]。

use crate::config::StorageConfig;
use crate::credentials::Credentials;
use crate::error::{Error, Result};
use crate::s3::config::{load_sdk_config, to_sdk_credentials};
use crate::s3::{ObjectStorage, ObjectUpload, PresignedRequest, presign};
use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use std::path::Path;
use std::time::Duration;

/// S3 兼容的对象存储
///
/// 每次操作都会用调用方给出的密钥重新构建客户端，
/// 这样临时密钥和长期密钥共用同一套签名逻辑。
#[derive(Debug, Clone)]
pub struct S3Storage {
    config: aws_sdk_s3::Config,
    bucket: String,
}

impl S3Storage {
    /// 使用环境中的存储配置创建实例。
    ///
    /// # 参数
    ///
    /// * `storage` - 对象存储账号配置。
    pub async fn from_config(storage: &StorageConfig) -> Self {
        let sdk_config = load_sdk_config(storage, Some(storage.endpoint_url())).await;
        Self::new(aws_sdk_s3::Config::from(&sdk_config), storage.bucket_name())
    }

    pub fn new(config: aws_sdk_s3::Config, bucket: impl Into<String>) -> Self {
        Self {
            config,
            bucket: bucket.into(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    fn client(&self, credentials: &Credentials) -> Client {
        let config = self
            .config
            .to_builder()
            .credentials_provider(to_sdk_credentials(credentials))
            .build();
        Client::from_conf(config)
    }

    async fn put(&self, credentials: &Credentials, object: &ObjectUpload, body: ByteStream) -> Result<()> {
        self.client(credentials)
            .put_object()
            .bucket(&self.bucket)
            .key(&object.path)
            .content_type(&object.content_type)
            .set_content_disposition(object.content_disposition.clone())
            .body(body)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(path = %object.path, error = %DisplayErrorContext(&e), "put object failed");
                Error::Upstream(DisplayErrorContext(&e).to_string())
            })?;
        Ok(())
    }
}

#[async_trait]
impl ObjectStorage for S3Storage {
    async fn presign_put(
        &self,
        credentials: &Credentials,
        object: &ObjectUpload,
        ttl: Duration,
    ) -> Result<PresignedRequest> {
        presign::presign_put(&self.client(credentials), &self.bucket, object, ttl).await
    }

    async fn presign_get(
        &self,
        credentials: &Credentials,
        path: &str,
        query: &[(String, String)],
        ttl: Duration,
    ) -> Result<String> {
        presign::presign_get(&self.client(credentials), &self.bucket, path, query, ttl).await
    }

    async fn put_object(
        &self,
        credentials: &Credentials,
        object: &ObjectUpload,
        body: Bytes,
    ) -> Result<()> {
        self.put(credentials, object, ByteStream::from(body)).await
    }

    async fn put_file(
        &self,
        credentials: &Credentials,
        object: &ObjectUpload,
        local_path: &Path,
    ) -> Result<()> {
        let body = ByteStream::from_path(local_path)
            .await
            .map_err(|e| Error::Upstream(format!("read {}: {e}", local_path.display())))?;
        self.put(credentials, object, body).await
    }
}
