//! 场景化预签名服务库
//!
//! 这是一个基于Axum的预签名服务，主要功能包括：
//! - 按业务场景校验文件类型并生成唯一的对象路径
//! - 生成上传、访问与文档预览的预签名URL
//! - 按最小权限申请临时密钥
//! - 生成 CDN 鉴权 URL

pub mod catalog;
pub mod cdn;
pub mod config;
pub mod content_type;
pub mod credentials;
pub mod error;
pub mod handlers;
pub mod path_builder;
pub mod policy;
pub mod presign;
pub mod s3;
pub mod scene;
pub mod sts;
pub mod utils;

pub use error::{Error, Result};

use axum::routing::{get, post};
use catalog::Catalog;
use cdn::CdnSigner;
use config::{Config, CredentialMode};
use credentials::{CredentialSource, StaticCredentials, TemporaryCredentials};
use http::Method;
use path_builder::PathBuilder;
use presign::Presigner;
use s3::S3Storage;
use std::sync::Arc;
use sts::StsIssuer;
use tower_http::cors::{AllowHeaders, CorsLayer};
use tower_http::trace::TraceLayer;

/// 处理器共享的状态
#[derive(Clone)]
pub struct AppState {
    pub presigner: Arc<Presigner>,
    /// 未配置 CDN 时为 `None`
    pub cdn: Option<Arc<CdnSigner>>,
}

/// 按配置组装处理器共享的状态
///
/// # 参数
///
/// * `config` - 从环境变量加载的配置
///
/// # 返回值
///
/// 场景配置文件无法读取或 CDN 域名无效时返回错误。
pub async fn build_state(config: &Config) -> Result<AppState> {
    let catalog = match &config.catalog_file {
        Some(path) => Catalog::from_file(path)?,
        None => {
            tracing::warn!("CATALOG_FILE is not set, no scene is registered");
            Catalog::builder().build()
        }
    };
    tracing::info!(scenes = catalog.scene_count(), "catalog loaded");

    let credentials: Arc<dyn CredentialSource> = match config.credential_mode {
        CredentialMode::Static => Arc::new(StaticCredentials::new(config.storage.credentials())),
        CredentialMode::Temporary => {
            let issuer = StsIssuer::from_config(&config.storage).await;
            Arc::new(TemporaryCredentials::new(
                config.storage.policy_builder(),
                Arc::new(issuer),
            ))
        }
    };

    let storage = S3Storage::from_config(&config.storage).await;
    tracing::info!(bucket = storage.bucket(), mode = ?config.credential_mode, "storage configured");

    let cdn = match &config.cdn {
        Some(cdn) => Some(Arc::new(CdnSigner::new(&cdn.domain, cdn.key.clone())?)),
        None => None,
    };

    Ok(AppState {
        presigner: Arc::new(Presigner::new(
            PathBuilder::new(Arc::new(catalog)),
            credentials,
            Arc::new(storage),
        )),
        cdn,
    })
}

/// 创建并配置Axum应用程序
///
/// # 参数
///
/// * `state` - 处理器共享的状态
///
/// # 返回值
///
/// 返回配置好的Axum Router实例
pub fn app(state: AppState) -> axum::Router {
    // 配置 CORS
    let cors = CorsLayer::permissive()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(AllowHeaders::any());

    axum::Router::new()
        .route("/health", get(handlers::handle_health))
        .route("/presign/upload", post(handlers::handle_upload_presign))
        .route("/presign/view", get(handlers::handle_view_presign))
        .route("/presign/preview", get(handlers::handle_preview_presign))
        .route("/cdn/auth-url", get(handlers::handle_cdn_auth_url))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
