//! Follow endpoints.

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use socialhub_common::AppResult;

use crate::extractors::AuthUser;
use crate::middleware::AppState;
use crate::response::ApiResponse;

/// Follow toggle request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleRequest {
    pub user_id: String,
}

/// Follow toggle response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleResponse {
    pub following: bool,
}

/// Toggle following a user.
async fn toggle(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ToggleRequest>,
) -> AppResult<ApiResponse<ToggleResponse>> {
    let result = state.follow_service.toggle(&user, &req.user_id).await?;
    Ok(ApiResponse::ok(ToggleResponse {
        following: result.following,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/toggle", post(toggle))
}
