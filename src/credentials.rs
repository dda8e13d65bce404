//! 签名密钥来源
//!
//! 预签名既可以直接使用长期密钥，也可以每次按最小权限申请临时密钥。
//! 两种方式都实现 [`CredentialSource`]，由 [`crate::presign::Presigner`] 统一调用。

use crate::error::Result;
use crate::policy::{Policy, PolicyBuilder};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

#[cfg(test)]
use mockall::automock;

/// 访问密钥
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    /// 临时密钥的会话令牌，长期密钥为 `None`
    pub session_token: Option<String>,
    pub expiration: Option<SystemTime>,
}

impl Credentials {
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: None,
            expiration: None,
        }
    }

    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }

    pub fn with_expiration(mut self, expiration: SystemTime) -> Self {
        self.expiration = Some(expiration);
        self
    }
}

// 不输出密钥内容
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"** redacted **")
            .field("session_token", &self.session_token.as_ref().map(|_| "** redacted **"))
            .field("expiration", &self.expiration)
            .finish()
    }
}

/// 本次签名需要访问的资源
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessScope {
    Upload {
        resources: Vec<String>,
        content_types: Vec<String>,
    },
    View {
        resources: Vec<String>,
    },
}

/// 签名密钥来源
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CredentialSource: Send + Sync {
    /// 获取用于本次签名的密钥
    async fn signing_credentials(&self, scope: &AccessScope, ttl: Duration) -> Result<Credentials>;
}

/// 临时密钥服务
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CredentialIssuer: Send + Sync {
    /// 按策略申请有效期为 `ttl` 的临时密钥
    async fn issue(&self, policy: &Policy, ttl: Duration) -> Result<Credentials>;
}

/// 长期密钥：所有签名都使用同一组密钥
#[derive(Debug, Clone)]
pub struct StaticCredentials {
    credentials: Credentials,
}

impl StaticCredentials {
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }
}

#[async_trait]
impl CredentialSource for StaticCredentials {
    async fn signing_credentials(&self, _scope: &AccessScope, _ttl: Duration) -> Result<Credentials> {
        Ok(self.credentials.clone())
    }
}

/// 临时密钥：每次签名都按访问范围申请新的临时密钥，不做缓存
#[derive(Clone)]
pub struct TemporaryCredentials {
    policies: PolicyBuilder,
    issuer: Arc<dyn CredentialIssuer>,
}

impl TemporaryCredentials {
    pub fn new(policies: PolicyBuilder, issuer: Arc<dyn CredentialIssuer>) -> Self {
        Self { policies, issuer }
    }
}

#[async_trait]
impl CredentialSource for TemporaryCredentials {
    async fn signing_credentials(&self, scope: &AccessScope, ttl: Duration) -> Result<Credentials> {
        let policy = match scope {
            AccessScope::Upload {
                resources,
                content_types,
            } => self.policies.upload_policy(resources, content_types)?,
            AccessScope::View { resources } => self.policies.view_policy(resources)?,
        };
        self.issuer.issue(&policy, ttl).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn policies() -> PolicyBuilder {
        PolicyBuilder::new("ap-guangzhou", "1250000000", "docs-1250000000")
    }

    /// 测试长期密钥与访问范围无关
    #[tokio::test]
    async fn test_static_credentials_ignore_scope() {
        let source = StaticCredentials::new(Credentials::new("id", "key"));
        let scope = AccessScope::View {
            resources: vec!["a.pdf".into()],
        };
        let credentials = source
            .signing_credentials(&scope, Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(credentials, Credentials::new("id", "key"));
    }

    /// 测试上传时按上传策略申请临时密钥
    #[tokio::test]
    async fn test_temporary_credentials_use_upload_policy() {
        let mut issuer = MockCredentialIssuer::new();
        issuer
            .expect_issue()
            .withf(|policy, ttl| {
                let statement = &policy.statement[0];
                statement.resource.len() == 1
                    && statement.resource[0].ends_with("/docs/a.pdf")
                    && statement.allowed_content_types()
                        == Some(&["application/pdf".to_string()][..])
                    && *ttl == Duration::from_secs(300)
            })
            .times(1)
            .returning(|_, _| Ok(Credentials::new("tmp-id", "tmp-key").with_session_token("token")));

        let source = TemporaryCredentials::new(policies(), Arc::new(issuer));
        let scope = AccessScope::Upload {
            resources: vec!["docs/a.pdf".into()],
            content_types: vec!["application/pdf".into()],
        };
        let credentials = source
            .signing_credentials(&scope, Duration::from_secs(300))
            .await
            .unwrap();
        assert_eq!(credentials.session_token.as_deref(), Some("token"));
    }

    /// 测试访问时按只读策略申请临时密钥
    #[tokio::test]
    async fn test_temporary_credentials_use_view_policy() {
        let mut issuer = MockCredentialIssuer::new();
        issuer
            .expect_issue()
            .withf(|policy, _| {
                policy.statement[0].action == vec!["name/cos:GetObject"]
                    && policy.statement[0].condition.is_none()
            })
            .times(1)
            .returning(|_, _| Ok(Credentials::new("tmp-id", "tmp-key")));

        let source = TemporaryCredentials::new(policies(), Arc::new(issuer));
        let scope = AccessScope::View {
            resources: vec!["docs/a.pdf".into()],
        };
        assert!(source.signing_credentials(&scope, Duration::from_secs(60)).await.is_ok());
    }

    /// 测试访问范围为空时不申请临时密钥
    #[tokio::test]
    async fn test_temporary_credentials_reject_empty_scope_before_issuing() {
        let mut issuer = MockCredentialIssuer::new();
        issuer.expect_issue().never();

        let source = TemporaryCredentials::new(policies(), Arc::new(issuer));
        let scope = AccessScope::Upload {
            resources: vec!["docs/a.pdf".into()],
            content_types: vec![],
        };
        let err = source
            .signing_credentials(&scope, Duration::from_secs(60))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::EmptyContentTypes));
    }

    /// 测试调试输出隐藏密钥与会话令牌
    #[test]
    fn test_debug_redacts_secrets() {
        let credentials = Credentials::new("id", "super-secret").with_session_token("tok");
        let debug = format!("{credentials:?}");
        assert!(debug.contains("id"));
        assert!(!debug.contains("super-secret"));
        assert!(!debug.contains("tok\""));
    }
}
