use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};

use crate::error::{ApiResponse, AppError, Result};
use crate::models::{CompleteProcessingRequest, CreateVideoRequest, Video, VideoQuery};
use crate::services::VideoService;
use crate::AppState;

/// Register an uploaded video
/// POST /api/video
pub async fn create_video(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CreateVideoRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Video>>)> {
    let Json(req) = payload?;
    let video = VideoService::create_video(&state.db, req).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(video))))
}

/// List a user's videos
/// GET /api/video?userId=xxx
pub async fn list_videos(
    State(state): State<AppState>,
    query: std::result::Result<Query<VideoQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<Video>>>> {
    let Query(query) = query?;
    let user_id = query
        .user_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::InvalidArgument("User ID is required".to_string()))?;

    let videos = VideoService::list_videos(&state.db, &user_id).await?;
    Ok(Json(ApiResponse::success(videos)))
}

/// GET /api/video/:id
pub async fn get_video(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Video>>> {
    let video = VideoService::get_video(&state.db, &id).await?;
    Ok(Json(ApiResponse::success(video)))
}

/// Processing pipeline callback: asset URLs are ready
/// PATCH /api/video/:id/assets
pub async fn complete_processing(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<CompleteProcessingRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Video>>> {
    let Json(req) = payload?;
    let video = VideoService::complete_processing(&state.db, &id, req).await?;
    Ok(Json(ApiResponse::success(video)))
}

/// Delete a video and everything shared from it
/// DELETE /api/video/:id
pub async fn delete_video(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>> {
    VideoService::delete_video(&state.db, &id).await?;
    Ok(Json(ApiResponse::<()>::success_message("Video deleted")))
}
