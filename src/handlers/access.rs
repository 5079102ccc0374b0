use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    Json,
};

use crate::error::{ApiResponse, AppError, Result};
use crate::models::{AccessQuery, LinkAccess, RecordAccessRequest};
use crate::services::AccessService;
use crate::AppState;

/// Record a link visit
/// POST /api/access
pub async fn record_access(
    State(state): State<AppState>,
    payload: std::result::Result<Json<RecordAccessRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<LinkAccess>>)> {
    let Json(req) = payload?;
    let share_link_id = req
        .share_link_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::InvalidArgument("Share link ID is required".to_string()))?;
    let video_id = req
        .video_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::InvalidArgument("Video ID is required".to_string()))?;

    let access = AccessService::record_access(
        &state.db,
        &share_link_id,
        &video_id,
        req.viewer_email.as_deref(),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(access))))
}

/// List access history of a video, newest first
/// GET /api/access?videoId=xxx
pub async fn list_accesses(
    State(state): State<AppState>,
    query: std::result::Result<Query<AccessQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<LinkAccess>>>> {
    let Query(query) = query?;
    let video_id = query
        .video_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::InvalidArgument("Video ID is required".to_string()))?;

    let accesses = AccessService::list_by_video(&state.db, &video_id).await?;
    Ok(Json(ApiResponse::success(accesses)))
}
