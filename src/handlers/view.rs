use super::constants::ttl_from_secs;
use super::{UrlResponse, error_response};
use crate::AppState;
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use serde::Deserialize;

/// 访问预签名查询参数
#[derive(Debug, Deserialize)]
pub struct ViewQuery {
    /// 对象路径
    pub path: String,
    /// 有效期（秒）
    pub expires_in: Option<u64>,
}

/// 处理访问文件预签名请求
///
/// # 请求方法
///
/// GET /presign/view?path=docs/a.pdf&expires_in=600
pub async fn handle_view_presign(
    State(state): State<AppState>,
    Query(query): Query<ViewQuery>,
) -> Result<Json<UrlResponse>, (StatusCode, String)> {
    let url = state
        .presigner
        .get_file_url(&query.path, ttl_from_secs(query.expires_in))
        .await
        .map_err(error_response)?;
    Ok(Json(UrlResponse { url }))
}

/// 处理文件预览预签名请求
///
/// # 请求方法
///
/// GET /presign/preview?path=docs/a.docx
pub async fn handle_preview_presign(
    State(state): State<AppState>,
    Query(query): Query<ViewQuery>,
) -> Result<Json<UrlResponse>, (StatusCode, String)> {
    let url = state
        .presigner
        .get_preview_file_url(&query.path, ttl_from_secs(query.expires_in))
        .await
        .map_err(error_response)?;
    Ok(Json(UrlResponse { url }))
}
