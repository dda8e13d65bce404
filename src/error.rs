//! 错误类型模块
//!
//! 所有操作失败都以 [`Error`] 返回给调用方，库内部不做任何重试。

use http::StatusCode;

/// 库内统一的结果类型
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// 文件名、路径等输入为空或格式不正确
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("file extension is missing: {0}")]
    MissingExtension(String),

    #[error("scene {0} is not registered")]
    SceneNotFound(i32),

    #[error("extension `{extension}` is not allowed in scene {scene}")]
    UnsupportedExtension { scene: i32, extension: String },

    #[error("no content type registered for extension `{0}`")]
    UnknownContentType(String),

    #[error("resource list must not be empty")]
    EmptyResources,

    #[error("content type list must not be empty")]
    EmptyContentTypes,

    /// 场景注册时缺少存储路径或文件类型
    #[error("invalid scene {id}: {reason}")]
    InvalidScene { id: i32, reason: &'static str },

    #[error("invalid content type mapping `{extension}` -> `{content_type}`")]
    InvalidContentType {
        extension: String,
        content_type: String,
    },

    /// 临时密钥服务未返回可用凭证
    #[error("credential issuance failed: {0}")]
    CredentialIssuanceFailed(String),

    #[error("presigning failed: {0}")]
    SigningFailed(String),

    #[error("upstream error: {0}")]
    Upstream(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// 错误对应的 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidInput(_)
            | Error::MissingExtension(_)
            | Error::UnsupportedExtension { .. }
            | Error::UnknownContentType(_)
            | Error::EmptyResources
            | Error::EmptyContentTypes => StatusCode::BAD_REQUEST,
            Error::SceneNotFound(_) => StatusCode::NOT_FOUND,
            Error::CredentialIssuanceFailed(_) | Error::SigningFailed(_) | Error::Upstream(_) => {
                StatusCode::BAD_GATEWAY
            }
            Error::InvalidScene { .. }
            | Error::InvalidContentType { .. }
            | Error::Config(_)
            | Error::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
