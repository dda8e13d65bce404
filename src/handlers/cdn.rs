use super::{UrlResponse, error_response};
use crate::AppState;
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CdnQuery {
    pub path: String,
}

/// 处理 CDN 鉴权 URL 请求
///
/// # 请求方法
///
/// GET /cdn/auth-url?path=images/a.png
///
/// # 返回值
///
/// 未配置 CDN 时返回 404。
pub async fn handle_cdn_auth_url(
    State(state): State<AppState>,
    Query(query): Query<CdnQuery>,
) -> Result<Json<UrlResponse>, (StatusCode, String)> {
    let Some(cdn) = state.cdn.as_ref() else {
        return Err((StatusCode::NOT_FOUND, "CDN is not configured".to_string()));
    };
    let url = cdn.get_auth_url(&query.path).map_err(error_response)?;
    Ok(Json(UrlResponse { url }))
}
