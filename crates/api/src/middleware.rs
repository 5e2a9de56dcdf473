//! API middleware.

#![allow(missing_docs)]

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use socialhub_core::{
    BlockService, CommentService, FollowService, LikeService, PostService, ReportService,
    UserService,
};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub post_service: PostService,
    pub like_service: LikeService,
    pub comment_service: CommentService,
    pub follow_service: FollowService,
    pub block_service: BlockService,
    pub report_service: ReportService,
}

/// Authentication middleware.
///
/// Resolves a `Bearer` token to its user and stores the model in request
/// extensions for the extractors. Requests without a valid token pass
/// through unauthenticated.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get("Authorization") {
        if let Ok(auth_str) = auth_header.to_str() {
            if let Some(token) = auth_str.strip_prefix("Bearer ") {
                if let Ok(user) = state.user_service.authenticate_by_token(token).await {
                    req.extensions_mut().insert(user);
                }
            }
        }
    }

    next.run(req).await
}
