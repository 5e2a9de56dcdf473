//! Post endpoints: timeline, details, creation, sharing, likes.

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use socialhub_common::AppResult;
use socialhub_core::{PostDetail, PostFilter};
use socialhub_db::entities::comment::Model as CommentModel;
use socialhub_db::entities::post::Model as PostModel;
use validator::Validate;

use crate::extractors::{AuthUser, MaybeAuthUser};
use crate::middleware::AppState;
use crate::response::ApiResponse;

/// Post representation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: String,
    pub user_id: String,
    pub text: String,
    pub image_url: Option<String>,
    pub category_id: Option<String>,
    pub shared_from_id: Option<String>,
    pub is_shared: bool,
    pub created_at: String,
}

impl From<PostModel> for PostResponse {
    fn from(p: PostModel) -> Self {
        Self {
            id: p.id,
            user_id: p.user_id,
            text: p.text,
            image_url: p.image_url,
            category_id: p.category_id,
            shared_from_id: p.shared_from_id,
            is_shared: p.is_shared,
            created_at: p.created_at.to_rfc3339(),
        }
    }
}

/// Comment representation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: String,
    pub post_id: String,
    pub user_id: String,
    pub text: String,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl From<CommentModel> for CommentResponse {
    fn from(c: CommentModel) -> Self {
        Self {
            id: c.id,
            post_id: c.post_id,
            user_id: c.user_id,
            text: c.text,
            created_at: c.created_at.to_rfc3339(),
            updated_at: c.updated_at.map(|t| t.to_rfc3339()),
        }
    }
}

/// Timeline request.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineRequest {
    pub query: Option<String>,
    pub category_id: Option<String>,
    pub tag: Option<String>,
}

/// Post detail request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowRequest {
    pub post_id: String,
}

/// Post creation request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequest {
    #[validate(length(min = 1, max = 5000))]
    pub text: String,
    pub image_url: Option<String>,
    pub category_id: Option<String>,
    /// Comma-separated tag names.
    #[serde(default)]
    pub tags: String,
}

/// Share request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ShareRequest {
    pub post_id: String,
    #[validate(length(max = 5000))]
    #[serde(default)]
    pub text: String,
}

/// Like toggle request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeRequest {
    pub post_id: String,
}

/// Like toggle response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeResponse {
    pub liked: bool,
    pub like_count: u64,
}

/// Post detail response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDetailResponse {
    pub post: PostResponse,
    pub author_username: String,
    pub comments: Vec<CommentResponse>,
    pub like_count: u64,
    pub tags: Vec<String>,
}

impl From<PostDetail> for PostDetailResponse {
    fn from(d: PostDetail) -> Self {
        Self {
            post: d.post.into(),
            author_username: d.author.username,
            comments: d.comments.into_iter().map(Into::into).collect(),
            like_count: d.like_count,
            tags: d.tags,
        }
    }
}

/// The home timeline.
async fn timeline(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<AppState>,
    Json(req): Json<TimelineRequest>,
) -> AppResult<ApiResponse<Vec<PostResponse>>> {
    let filter = PostFilter {
        query: req.query,
        category_id: req.category_id,
        tag_name: req.tag,
    };

    let posts = state
        .post_service
        .home_feed(viewer.as_ref().map(|u| u.id.as_str()), &filter)
        .await?;
    Ok(ApiResponse::ok(posts.into_iter().map(Into::into).collect()))
}

/// A post with its comments, like count and tags.
async fn show(
    State(state): State<AppState>,
    Json(req): Json<ShowRequest>,
) -> AppResult<ApiResponse<PostDetailResponse>> {
    let detail = state.post_service.post_detail(&req.post_id).await?;
    Ok(ApiResponse::ok(detail.into()))
}

/// Create a post.
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateRequest>,
) -> AppResult<ApiResponse<PostResponse>> {
    req.validate()?;

    let post = state
        .post_service
        .create_post(
            &user,
            &req.text,
            req.image_url.as_deref(),
            req.category_id.as_deref(),
            &req.tags,
        )
        .await?;
    Ok(ApiResponse::ok(post.into()))
}

/// Share a post.
async fn share(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ShareRequest>,
) -> AppResult<ApiResponse<PostResponse>> {
    req.validate()?;

    let post = state
        .post_service
        .share_post(&user, &req.post_id, &req.text)
        .await?;
    Ok(ApiResponse::ok(post.into()))
}

/// Toggle a like.
async fn like(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<LikeRequest>,
) -> AppResult<ApiResponse<LikeResponse>> {
    let toggle = state.like_service.toggle(&user, &req.post_id).await?;
    Ok(ApiResponse::ok(LikeResponse {
        liked: toggle.liked,
        like_count: toggle.like_count,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/timeline", post(timeline))
        .route("/show", post(show))
        .route("/create", post(create))
        .route("/share", post(share))
        .route("/like", post(like))
}
