//! 临时密钥服务
//!
//! 通过 STS `GetFederationToken` 按策略申请临时密钥。
//! 策略为 COS 语法的 JSON（`version` 为 `2.0`，资源形如 `qcs::cos:<地域>:uid/<APPID>:<存储桶>/<路径>`），
//! 原样交给 STS 兼容端点。

use crate::config::StorageConfig;
use crate::credentials::{CredentialIssuer, Credentials};
use crate::error::{Error, Result};
use crate::policy::Policy;
use crate::s3::config::load_sdk_config;
use async_trait::async_trait;
use aws_sdk_sts::Client;
use aws_sdk_sts::error::DisplayErrorContext;
use std::time::{Duration, SystemTime};

/// 联合身份名称
pub const DEFAULT_FEDERATION_NAME: &str = "scene-presign";

/// `GetFederationToken` 接受的最短有效期（秒）
pub const MIN_DURATION_SECONDS: i32 = 900;

/// `GetFederationToken` 接受的最长有效期（秒）
pub const MAX_DURATION_SECONDS: i32 = 129_600;

#[derive(Debug, Clone)]
pub struct StsIssuer {
    client: Client,
    name: String,
}

impl StsIssuer {
    pub async fn from_config(storage: &StorageConfig) -> Self {
        let sdk_config = load_sdk_config(storage, storage.sts_endpoint.clone()).await;
        Self::new(Client::new(&sdk_config))
    }

    pub fn new(client: Client) -> Self {
        Self {
            client,
            name: DEFAULT_FEDERATION_NAME.to_string(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

#[async_trait]
impl CredentialIssuer for StsIssuer {
    async fn issue(&self, policy: &Policy, ttl: Duration) -> Result<Credentials> {
        let output = self
            .client
            .get_federation_token()
            .name(&self.name)
            .policy(policy.to_json()?)
            .duration_seconds(duration_seconds(ttl))
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %DisplayErrorContext(&e), "federation token request failed");
                Error::CredentialIssuanceFailed(DisplayErrorContext(&e).to_string())
            })?;

        let issued = output
            .credentials()
            .ok_or_else(|| Error::CredentialIssuanceFailed("response has no credentials".to_string()))?;

        let credentials = Credentials::new(issued.access_key_id(), issued.secret_access_key())
            .with_session_token(issued.session_token());
        let credentials = match SystemTime::try_from(*issued.expiration()) {
            Ok(expiration) => credentials.with_expiration(expiration),
            Err(_) => credentials,
        };
        validate(credentials)
    }
}

/// 将有效期限制在 STS 接受的范围内，密钥有效期不短于预签名有效期
fn duration_seconds(ttl: Duration) -> i32 {
    i32::try_from(ttl.as_secs())
        .unwrap_or(MAX_DURATION_SECONDS)
        .clamp(MIN_DURATION_SECONDS, MAX_DURATION_SECONDS)
}

/// 拒绝空的密钥
fn validate(credentials: Credentials) -> Result<Credentials> {
    if credentials.access_key_id.is_empty() || credentials.secret_access_key.is_empty() {
        return Err(Error::CredentialIssuanceFailed(
            "issued credentials are empty".to_string(),
        ));
    }
    Ok(credentials)
}
