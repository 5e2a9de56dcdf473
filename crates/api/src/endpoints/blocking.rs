//! Blocking endpoints.

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use socialhub_common::AppResult;

use crate::extractors::AuthUser;
use crate::middleware::AppState;
use crate::response::ApiResponse;

use super::users::UserResponse;

/// Block toggle request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleRequest {
    pub user_id: String,
}

/// Unblock request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnblockRequest {
    pub user_id: String,
}

/// Block toggle response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleResponse {
    pub blocked: bool,
}

/// Toggle blocking a user.
async fn toggle(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ToggleRequest>,
) -> AppResult<ApiResponse<ToggleResponse>> {
    let result = state.block_service.toggle(&user.id, &req.user_id).await?;
    Ok(ApiResponse::ok(ToggleResponse {
        blocked: result.blocked,
    }))
}

/// Remove a block explicitly.
async fn unblock(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<UnblockRequest>,
) -> AppResult<ApiResponse<()>> {
    state.block_service.unblock(&user.id, &req.user_id).await?;
    Ok(ApiResponse::ok(()))
}

/// List blocked users.
async fn list(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<UserResponse>>> {
    let users = state.block_service.list(&user.id).await?;
    Ok(ApiResponse::ok(users.into_iter().map(Into::into).collect()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/toggle", post(toggle))
        .route("/delete", post(unblock))
        .route("/list", post(list))
}
