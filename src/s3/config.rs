//! S3 客户端配置模块
//!
//! 该模块负责根据 [`StorageConfig`] 构建 SDK 配置，以及把签名密钥转换为 SDK 的凭证类型。

use crate::config::StorageConfig;
use crate::credentials::Credentials;
use aws_config::meta::region::RegionProviderChain;
use aws_config::{BehaviorVersion, Region, SdkConfig};

/// SDK 凭证的来源名称
const PROVIDER_NAME: &str = "scene-presign";

/// 使用长期密钥加载 SDK 配置。
///
/// # 参数
///
/// * `storage` - 对象存储账号配置。
/// * `endpoint` - 服务端点，未设置时使用 SDK 默认端点。
///
/// # 返回值
///
/// 加载完成的 `SdkConfig`。
pub async fn load_sdk_config(storage: &StorageConfig, endpoint: Option<String>) -> SdkConfig {
    let region_provider = RegionProviderChain::first_try(Some(Region::new(storage.region.clone())));

    let mut loader = aws_config::defaults(BehaviorVersion::latest())
        .credentials_provider(to_sdk_credentials(&storage.credentials()))
        .region(region_provider);
    if let Some(endpoint) = endpoint {
        loader = loader.endpoint_url(endpoint);
    }

    loader.load().await
}

/// 转换为 SDK 的静态凭证
pub fn to_sdk_credentials(credentials: &Credentials) -> aws_sdk_s3::config::Credentials {
    aws_sdk_s3::config::Credentials::new(
        credentials.access_key_id.clone(),
        credentials.secret_access_key.clone(),
        credentials.session_token.clone(),
        credentials.expiration,
        PROVIDER_NAME,
    )
}
