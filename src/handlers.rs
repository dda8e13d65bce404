//! HTTP请求处理模块
//!
//! 此模块包含了对外提供的所有处理器：
//! - 上传文件预签名处理器
//! - 访问与预览预签名处理器
//! - CDN 鉴权 URL 处理器

pub mod cdn;
pub mod constants;
pub mod upload;
pub mod view;

// 重新导出主要的公共接口
pub use cdn::handle_cdn_auth_url;
pub use upload::handle_upload_presign;
pub use view::{handle_preview_presign, handle_view_presign};

use crate::error::Error;
use axum::http::StatusCode;
use serde::Serialize;

/// 只包含一个 URL 的响应体
#[derive(Debug, Serialize)]
pub struct UrlResponse {
    pub url: String,
}

/// 将库错误转换为 HTTP 错误响应
pub fn error_response(err: Error) -> (StatusCode, String) {
    let status = err.status_code();
    if status.is_server_error() {
        tracing::warn!(error = %err, "request failed");
    } else {
        tracing::debug!(error = %err, "request rejected");
    }
    (status, err.to_string())
}

/// 健康检查
pub async fn handle_health() -> &'static str {
    "ok"
}
