use axum::{
    body::Bytes,
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, HeaderMap, StatusCode},
    Json,
};

use crate::error::{ApiResponse, AppError, Result};
use crate::models::{
    CreateLinkRequest, LinkQuery, ResolveLinkRequest, ResolvedLink, ShareLink, ShareLinkDetail,
    UpdateLinkRequest,
};
use crate::services::LinkService;
use crate::AppState;

/// Create a share link
/// POST /api/link
pub async fn create_link(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CreateLinkRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<ShareLinkDetail>>)> {
    let Json(req) = payload?;
    let link = LinkService::create_link(&state.db, req).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(link))))
}

/// List share links of a video
/// GET /api/link?videoId=xxx
pub async fn list_links(
    State(state): State<AppState>,
    query: std::result::Result<Query<LinkQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<ShareLink>>>> {
    let Query(query) = query?;
    let video_id = query
        .video_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::InvalidArgument("Video ID is required".to_string()))?;

    let links = LinkService::list_by_video(&state.db, &video_id).await?;
    Ok(Json(ApiResponse::success(links)))
}

/// Get a share link with creator, whitelist and access history
/// GET /api/link/:id
pub async fn get_link(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ShareLinkDetail>>> {
    let link = LinkService::get_link(&state.db, &id).await?;
    Ok(Json(ApiResponse::success(link)))
}

/// Partially update a share link
/// PATCH /api/link/:id
pub async fn update_link(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<UpdateLinkRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<ShareLinkDetail>>> {
    let Json(req) = payload?;
    let link = LinkService::update_link(&state.db, &id, req).await?;
    Ok(Json(ApiResponse::success(link)))
}

/// Delete a share link
/// DELETE /api/link/:id
pub async fn delete_link(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>> {
    LinkService::delete_link(&state.db, &id).await?;
    Ok(Json(ApiResponse::<()>::success_message(
        "Share link deleted successfully",
    )))
}

/// Open a share link as a viewer: checks expiry and whitelist, then logs the visit
/// POST /api/link/:id/resolve
///
/// An empty body resolves anonymously.
pub async fn resolve_link(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ApiResponse<ResolvedLink>>> {
    let req = if body.iter().all(u8::is_ascii_whitespace) {
        ResolveLinkRequest::default()
    } else if !has_json_content_type(&headers) {
        return Err(AppError::InvalidArgument(
            "Expected request with `Content-Type: application/json`".to_string(),
        ));
    } else {
        let Json(req) = Json::<ResolveLinkRequest>::from_bytes(&body)?;
        req
    };
    let resolved = LinkService::resolve_link(&state.db, &id, req.viewer_email.as_deref()).await?;
    Ok(Json(ApiResponse::success(resolved)))
}

fn has_json_content_type(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.trim_start().starts_with("application/json"))
        .unwrap_or(false)
}
