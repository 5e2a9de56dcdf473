//! API integration tests.
//!
//! Wire the full router against a mock database and exercise it over HTTP.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware, Router,
};
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
use socialhub_api::{middleware::AppState, router as api_router};
use socialhub_core::{
    BlockService, CommentService, FollowService, LikeService, Mailer, NotificationService,
    PostService, ReportService, UserService, VisibilityService,
};
use socialhub_db::repositories::{
    BlockRepository, CategoryRepository, CommentRepository, FollowRepository, LikeRepository,
    PostRepository, ProfileRepository, ReportRepository, SettingsRepository, TagRepository,
    UserRepository,
};
use std::sync::Arc;
use tower::ServiceExt;

fn create_state(db: DatabaseConnection) -> AppState {
    let db = Arc::new(db);

    let user_repo = UserRepository::new(Arc::clone(&db));
    let profile_repo = ProfileRepository::new(Arc::clone(&db));
    let settings_repo = SettingsRepository::new(Arc::clone(&db));
    let post_repo = PostRepository::new(Arc::clone(&db));
    let comment_repo = CommentRepository::new(Arc::clone(&db));
    let like_repo = LikeRepository::new(Arc::clone(&db));
    let tag_repo = TagRepository::new(Arc::clone(&db));
    let category_repo = CategoryRepository::new(Arc::clone(&db));
    let follow_repo = FollowRepository::new(Arc::clone(&db));
    let block_repo = BlockRepository::new(Arc::clone(&db));
    let report_repo = ReportRepository::new(Arc::clone(&db));

    let visibility = VisibilityService::new(settings_repo.clone(), follow_repo.clone());
    let notifications = NotificationService::new(
        settings_repo.clone(),
        user_repo.clone(),
        Mailer::disabled(),
        "SocialHub".to_string(),
    );

    AppState {
        user_service: UserService::new(
            user_repo.clone(),
            profile_repo,
            settings_repo,
            post_repo.clone(),
            follow_repo.clone(),
            block_repo.clone(),
            visibility.clone(),
            notifications.clone(),
        ),
        post_service: PostService::new(
            post_repo.clone(),
            comment_repo.clone(),
            like_repo.clone(),
            tag_repo,
            category_repo,
            user_repo.clone(),
            visibility,
        ),
        like_service: LikeService::new(like_repo, post_repo.clone(), notifications.clone()),
        comment_service: CommentService::new(comment_repo, post_repo, notifications.clone()),
        follow_service: FollowService::new(follow_repo, user_repo.clone(), notifications),
        block_service: BlockService::new(block_repo, user_repo.clone()),
        report_service: ReportService::new(report_repo, user_repo),
    }
}

fn create_app(db: DatabaseConnection) -> Router {
    let state = create_state(db);
    Router::new()
        .nest("/api", api_router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            socialhub_api::middleware::auth_middleware,
        ))
        .with_state(state)
}

fn json_request(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_create_post_requires_auth() {
    let app = create_app(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

    let response = app
        .oneshot(json_request("/api/posts/create", r#"{"text":"hello"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_following_toggle_requires_auth() {
    let app = create_app(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

    let response = app
        .oneshot(json_request("/api/following/toggle", r#"{"userId":"u1"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_timeline_allows_anonymous() {
    use socialhub_db::entities::post;

    // Empty candidate set: one query for the filtered scan.
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<post::Model>::new()])
        .into_connection();

    let app = create_app(db);

    let response = app
        .oneshot(json_request("/api/posts/timeline", "{}"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_register_rejects_invalid_email() {
    let app = create_app(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

    let response = app
        .oneshot(json_request(
            "/api/account/register",
            r#"{"username":"alice","email":"not-an-email","password":"password123"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_show_missing_post_is_404() {
    use socialhub_db::entities::post;

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<post::Model>::new()])
        .into_connection();

    let app = create_app(db);

    let response = app
        .oneshot(json_request("/api/posts/show", r#"{"postId":"missing"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
