use super::constants::ttl_from_secs;
use super::error_response;
use crate::AppState;
use crate::presign::{DispositionType, PresignedInfo};
use crate::scene::SceneType;
use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;

/// 上传预签名请求体
#[derive(Debug, Deserialize)]
pub struct UploadPresignRequest {
    /// 场景类型
    pub scene: SceneType,
    /// 原始文件名
    pub filename: String,
    #[serde(default)]
    pub disposition: DispositionType,
    /// 有效期（秒）
    #[serde(default)]
    pub expires_in: Option<u64>,
    /// 场景路径下的子路径
    #[serde(default)]
    pub paths: Vec<String>,
}

/// 处理上传文件预签名请求
///
/// # 请求方法
///
/// POST /presign/upload
///
/// # 请求示例
///
/// ```json
/// {"scene": 1, "filename": "report.pdf", "disposition": "attachment", "expires_in": 600, "paths": ["2024"]}
/// ```
///
/// # 返回值
///
/// * `Ok(Json<PresignedInfo>)` - 上传地址、文件路径与上传时必须携带的请求头
/// * `Err((StatusCode, String))` - 文件类型不支持、场景不存在或签名失败
pub async fn handle_upload_presign(
    State(state): State<AppState>,
    Json(request): Json<UploadPresignRequest>,
) -> Result<Json<PresignedInfo>, (StatusCode, String)> {
    state
        .presigner
        .get_upload_presigned_info(
            request.scene,
            request.disposition,
            &request.filename,
            ttl_from_secs(request.expires_in),
            request.paths.as_slice(),
        )
        .await
        .map(Json)
        .map_err(error_response)
}
