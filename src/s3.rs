//! 对象存储模块
//!
//! 定义预签名与上传所需的对象存储能力 [`ObjectStorage`]，
//! 并基于 `aws-sdk-s3` 提供 S3 兼容接口的实现 [`S3Storage`]。

pub mod config;
pub mod presign;
pub mod s3_ops;

pub use s3_ops::S3Storage;

use crate::credentials::Credentials;
use crate::error::Result;
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

#[cfg(test)]
use mockall::automock;

/// 待写入对象的路径与响应头
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectUpload {
    pub path: String,
    pub content_type: String,
    /// 需要以附件方式响应时的 Content-Disposition
    pub content_disposition: Option<String>,
}

/// 预签名请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresignedRequest {
    pub url: String,
    /// 发起请求时必须携带的头部
    pub headers: BTreeMap<String, String>,
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// 生成上传对象的 PUT 预签名请求
    async fn presign_put(
        &self,
        credentials: &Credentials,
        object: &ObjectUpload,
        ttl: Duration,
    ) -> Result<PresignedRequest>;

    /// 生成访问对象的 GET 预签名 URL，`query` 中的参数一并签名
    async fn presign_get(
        &self,
        credentials: &Credentials,
        path: &str,
        query: &[(String, String)],
        ttl: Duration,
    ) -> Result<String>;

    /// 上传内存中的对象
    async fn put_object(
        &self,
        credentials: &Credentials,
        object: &ObjectUpload,
        body: Bytes,
    ) -> Result<()>;

    /// 上传本地文件
    async fn put_file(
        &self,
        credentials: &Credentials,
        object: &ObjectUpload,
        local_path: &Path,
    ) -> Result<()>;
}
