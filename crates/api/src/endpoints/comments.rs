//! Comment endpoints.

use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;
use socialhub_common::AppResult;
use validator::Validate;

use crate::extractors::AuthUser;
use crate::middleware::AppState;
use crate::response::ApiResponse;

use super::posts::CommentResponse;

/// Comment creation request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequest {
    pub post_id: String,
    #[validate(length(min = 1, max = 2000))]
    pub text: String,
}

/// Comment edit request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequest {
    pub comment_id: String,
    #[validate(length(min = 1, max = 2000))]
    pub text: String,
}

/// Comment deletion request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteRequest {
    pub comment_id: String,
}

/// Add a comment to a post.
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateRequest>,
) -> AppResult<ApiResponse<CommentResponse>> {
    req.validate()?;

    let comment = state
        .comment_service
        .add(&user, &req.post_id, &req.text)
        .await?;
    Ok(ApiResponse::ok(comment.into()))
}

/// Edit an own comment.
async fn update(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<UpdateRequest>,
) -> AppResult<ApiResponse<CommentResponse>> {
    req.validate()?;

    let comment = state
        .comment_service
        .edit(&user.id, &req.comment_id, &req.text)
        .await?;
    Ok(ApiResponse::ok(comment.into()))
}

/// Delete an own comment.
async fn delete(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<DeleteRequest>,
) -> AppResult<ApiResponse<()>> {
    state
        .comment_service
        .delete(&user.id, &req.comment_id)
        .await?;
    Ok(ApiResponse::ok(()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(create))
        .route("/update", post(update))
        .route("/delete", post(delete))
}
