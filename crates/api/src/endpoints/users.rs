//! User endpoints: discovery, profile pages, reports.

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use socialhub_common::AppResult;
use socialhub_core::ProfilePage;
use socialhub_db::entities::report::ReportReason;
use socialhub_db::entities::user::Model as UserModel;
use validator::Validate;

use crate::extractors::{AuthUser, MaybeAuthUser};
use crate::middleware::AppState;
use crate::response::ApiResponse;

use super::posts::PostResponse;

/// Public user representation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub created_at: String,
}

impl From<UserModel> for UserResponse {
    fn from(u: UserModel) -> Self {
        Self {
            id: u.id,
            username: u.username,
            created_at: u.created_at.to_rfc3339(),
        }
    }
}

/// Search request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    #[validate(length(max = 100))]
    pub query: String,
}

/// Profile page request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowRequest {
    pub username: String,
}

/// Report request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    pub user_id: String,
    pub post_id: Option<String>,
    pub reason: ReportReason,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub description: String,
}

/// Profile page response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub user: UserResponse,
    pub visible: bool,
    pub bio: String,
    pub avatar_url: Option<String>,
    pub posts: Vec<PostResponse>,
    pub post_count: u64,
    pub follower_count: u64,
    pub following_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocked_users: Option<Vec<UserResponse>>,
}

impl From<ProfilePage> for ProfileResponse {
    fn from(page: ProfilePage) -> Self {
        Self {
            user: page.user.into(),
            visible: page.visible,
            bio: page.bio,
            avatar_url: page.avatar_url,
            posts: page.posts.into_iter().map(Into::into).collect(),
            post_count: page.post_count,
            follower_count: page.follower_count,
            following_count: page.following_count,
            blocked_users: page
                .blocked_users
                .map(|users| users.into_iter().map(Into::into).collect()),
        }
    }
}

/// Search users by username substring.
async fn search(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<SearchRequest>,
) -> AppResult<ApiResponse<Vec<UserResponse>>> {
    req.validate()?;

    let users = state.user_service.search(&req.query, &user.id).await?;
    Ok(ApiResponse::ok(users.into_iter().map(Into::into).collect()))
}

/// Show a profile page.
async fn show(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<AppState>,
    Json(req): Json<ShowRequest>,
) -> AppResult<ApiResponse<ProfileResponse>> {
    let page = state
        .user_service
        .profile_page(viewer.as_ref().map(|u| u.id.as_str()), &req.username)
        .await?;
    Ok(ApiResponse::ok(page.into()))
}

/// Report a user.
async fn report(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ReportRequest>,
) -> AppResult<ApiResponse<()>> {
    req.validate()?;

    state
        .report_service
        .create(
            &user.id,
            &req.user_id,
            req.post_id.as_deref(),
            req.reason,
            &req.description,
        )
        .await?;
    Ok(ApiResponse::ok(()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/search", post(search))
        .route("/show", post(show))
        .route("/report", post(report))
}
