use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};

use crate::error::{ApiResponse, Result};
use crate::models::{ProvisionUserRequest, User};
use crate::services::UserService;
use crate::AppState;

/// Provision (or sync) the signed-in user
/// POST /api/user
pub async fn provision_user(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ProvisionUserRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<User>>> {
    let Json(req) = payload?;
    let user = UserService::provision_user(&state.db, req).await?;
    Ok(Json(ApiResponse::success(user)))
}

/// GET /api/user/:id
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<User>>> {
    let user = UserService::get_user(&state.db, &id).await?;
    Ok(Json(ApiResponse::success(user)))
}
