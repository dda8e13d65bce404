//! 服务配置模块
//!
//! 该模块负责从环境变量加载配置。`main` 会先通过 `dotenvy` 读取 `.env` 文件。
//!
//! # 环境变量
//!
//! * `STORAGE_SECRET_ID` / `STORAGE_SECRET_KEY` - 长期密钥（必填）
//! * `STORAGE_APP_ID` - 账号 APPID（必填）
//! * `STORAGE_BUCKET` - 存储桶名称，不含 APPID 后缀（必填）
//! * `STORAGE_REGION` - 存储桶地域（必填）
//! * `STORAGE_ENDPOINT` - 对象存储端点，默认 `https://cos.<地域>.myqcloud.com`
//! * `STS_ENDPOINT` - 临时密钥服务端点
//! * `CREDENTIAL_MODE` - `static` 或 `temporary`，默认 `static`
//! * `CDN_DOMAIN` / `CDN_KEY` - CDN 鉴权域名与密钥，同时设置时启用
//! * `CATALOG_FILE` - 场景配置 JSON 文件
//! * `BIND_ADDR` - 监听地址，默认 `0.0.0.0:3000`

use crate::credentials::Credentials;
use crate::error::{Error, Result};
use crate::policy::PolicyBuilder;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// 签名密钥的获取方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CredentialMode {
    /// 直接使用长期密钥签名
    #[default]
    Static,
    /// 每次签名前申请临时密钥
    Temporary,
}

impl FromStr for CredentialMode {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "static" => Ok(CredentialMode::Static),
            "temporary" | "sts" => Ok(CredentialMode::Temporary),
            other => Err(Error::Config(format!("unknown CREDENTIAL_MODE `{other}`"))),
        }
    }
}

/// 对象存储账号与存储桶
#[derive(Clone)]
pub struct StorageConfig {
    pub secret_id: String,
    pub secret_key: String,
    pub app_id: String,
    pub bucket: String,
    pub region: String,
    pub endpoint: Option<String>,
    pub sts_endpoint: Option<String>,
}

impl std::fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageConfig")
            .field("secret_id", &self.secret_id)
            .field("app_id", &self.app_id)
            .field("bucket", &self.bucket)
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .field("sts_endpoint", &self.sts_endpoint)
            .finish_non_exhaustive()
    }
}

impl StorageConfig {
    /// 完整的存储桶名称 `<存储桶>-<APPID>`
    pub fn bucket_name(&self) -> String {
        format!("{}-{}", self.bucket, self.app_id)
    }

    pub fn endpoint_url(&self) -> String {
        self.endpoint
            .clone()
            .unwrap_or_else(|| format!("https://cos.{}.myqcloud.com", self.region))
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.secret_id, &self.secret_key)
    }

    pub fn policy_builder(&self) -> PolicyBuilder {
        PolicyBuilder::new(&self.region, &self.app_id, self.bucket_name())
    }
}

#[derive(Debug, Clone)]
pub struct CdnConfig {
    pub domain: String,
    pub key: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub storage: StorageConfig,
    pub credential_mode: CredentialMode,
    pub cdn: Option<CdnConfig>,
    pub catalog_file: Option<PathBuf>,
    pub bind_addr: String,
}

impl Config {
    /// 从进程环境变量加载配置
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源加载配置，空字符串视为未设置
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let required = |key: &str| {
            optional(key).ok_or_else(|| Error::Config(format!("{key} must be set")))
        };

        let storage = StorageConfig {
            secret_id: required("STORAGE_SECRET_ID")?,
            secret_key: required("STORAGE_SECRET_KEY")?,
            app_id: required("STORAGE_APP_ID")?,
            bucket: required("STORAGE_BUCKET")?,
            region: required("STORAGE_REGION")?,
            endpoint: optional("STORAGE_ENDPOINT"),
            sts_endpoint: optional("STS_ENDPOINT"),
        };

        let credential_mode = optional("CREDENTIAL_MODE")
            .map(|mode| mode.parse())
            .transpose()?
            .unwrap_or_default();

        let cdn = match (optional("CDN_DOMAIN"), optional("CDN_KEY")) {
            (Some(domain), Some(key)) => Some(CdnConfig { domain, key }),
            (None, None) => None,
            _ => {
                return Err(Error::Config(
                    "CDN_DOMAIN and CDN_KEY must be set together".to_string(),
                ));
            }
        };

        Ok(Self {
            storage,
            credential_mode,
            cdn,
            catalog_file: optional("CATALOG_FILE").map(PathBuf::from),
            bind_addr: optional("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
        })
    }
}
