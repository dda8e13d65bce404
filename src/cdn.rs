//! CDN 鉴权 URL
//!
//! 签名为 `md5(密钥 + 路径 + 时间戳)` 的十六进制摘要，
//! 以 `sign` 与 `t` 两个查询参数附加在 URL 上。

use crate::error::{Error, Result};
use crate::utils::clock::{Clock, SystemClock};
use crate::utils::path::normalize_path;
use std::sync::Arc;
use url::Url;

/// 仅用于解析相对路径
const PATH_BASE: &str = "http://localhost/";

/// 一次签名的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CdnSignature {
    pub sign: String,
    pub timestamp: i64,
}

impl CdnSignature {
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        vec![
            ("sign".to_string(), self.sign.clone()),
            ("t".to_string(), self.timestamp.to_string()),
        ]
    }
}

#[derive(Clone)]
pub struct CdnSigner {
    domain: Url,
    key: String,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for CdnSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CdnSigner")
            .field("domain", &self.domain.as_str())
            .finish_non_exhaustive()
    }
}

impl CdnSigner {
    pub fn new(domain: &str, key: impl Into<String>) -> Result<Self> {
        Self::with_clock(domain, key, Arc::new(SystemClock))
    }

    pub fn with_clock(domain: &str, key: impl Into<String>, clock: Arc<dyn Clock>) -> Result<Self> {
        let domain = Url::parse(domain)
            .map_err(|e| Error::Config(format!("invalid CDN domain `{domain}`: {e}")))?;
        if domain.cannot_be_a_base() {
            return Err(Error::Config(format!("invalid CDN domain `{domain}`")));
        }
        Ok(Self {
            domain,
            key: key.into(),
            clock,
        })
    }

    /// 对已转义、以 `/` 开头的路径签名，时间戳取当前时间
    pub fn sign(&self, path: &str) -> CdnSignature {
        let timestamp = self.clock.unix_seconds();
        let path = format!("/{}", normalize_path(path));
        let digest = md5::compute(format!("{}{}{}", self.key, path, timestamp));
        CdnSignature {
            sign: format!("{digest:x}"),
            timestamp,
        }
    }

    /// 获取鉴权查询参数
    ///
    /// # 参数
    ///
    /// * `file_path` - 文件路径或完整 URL，只使用其中的路径部分
    pub fn get_auth_values(&self, file_path: &str) -> Result<Vec<(String, String)>> {
        let path = escaped_path(file_path)?;
        Ok(self.sign(&path).query_pairs())
    }

    /// 获取带鉴权参数的 CDN URL
    ///
    /// # 参数
    ///
    /// * `file_path` - 文件路径或完整 URL，只使用其中的路径部分
    ///
    /// # 返回值
    ///
    /// `<CDN 域名><路径>?sign=<签名>&t=<时间戳>`
    pub fn get_auth_url(&self, file_path: &str) -> Result<String> {
        let path = escaped_path(file_path)?;
        let signature = self.sign(&path);

        let mut url = self.domain.clone();
        url.set_path(&path);
        url.set_query(None);
        url.set_fragment(None);
        url.query_pairs_mut()
            .append_pair("sign", &signature.sign)
            .append_pair("t", &signature.timestamp.to_string());
        Ok(url.to_string())
    }
}

/// 解析出转义后的规范路径，以 `/` 开头
fn escaped_path(file_path: &str) -> Result<String> {
    if file_path.trim().is_empty() {
        return Err(Error::InvalidInput("path must not be empty".to_string()));
    }
    let base = Url::parse(PATH_BASE).map_err(|e| Error::Config(e.to_string()))?;
    let url = base
        .join(file_path)
        .map_err(|e| Error::InvalidInput(format!("invalid path `{file_path}`: {e}")))?;
    Ok(format!("/{}", normalize_path(url.path())))
}
