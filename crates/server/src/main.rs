//! SocialHub server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{middleware, Router};
use socialhub_api::{middleware::AppState, router as api_router};
use socialhub_common::Config;
use socialhub_core::{
    BlockService, CommentService, FollowService, LikeService, Mailer, NotificationService,
    PostService, ReportService, UserService, VisibilityService,
};
use socialhub_db::repositories::{
    BlockRepository, CategoryRepository, CommentRepository, FollowRepository, LikeRepository,
    PostRepository, ProfileRepository, ReportRepository, SettingsRepository, TagRepository,
    UserRepository,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[allow(clippy::expect_used)]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "socialhub=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting socialhub server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database
    let db = socialhub_db::init(&config).await?;
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    socialhub_db::migrate(&db).await?;
    info!("Migrations completed");

    // Initialize repositories
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

    // Initialize services
    let mailer = Mailer::new(config.mail.as_ref())?;
    if mailer.is_enabled() {
        info!("Mail transport configured");
    } else {
        info!("Mail transport disabled, notifications will be logged only");
    }

    let visibility = VisibilityService::new(settings_repo.clone(), follow_repo.clone());
    let notifications = NotificationService::new(
        settings_repo.clone(),
        user_repo.clone(),
        mailer,
        config.server.site_name.clone(),
    );

    let user_service = UserService::new(
        user_repo.clone(),
        profile_repo,
        settings_repo.clone(),
        post_repo.clone(),
        follow_repo.clone(),
        block_repo.clone(),
        visibility.clone(),
        notifications.clone(),
    );
    let post_service = PostService::new(
        post_repo.clone(),
        comment_repo.clone(),
        like_repo.clone(),
        tag_repo,
        category_repo,
        user_repo.clone(),
        visibility,
    );
    let like_service = LikeService::new(like_repo, post_repo.clone(), notifications.clone());
    let comment_service = CommentService::new(comment_repo, post_repo, notifications.clone());
    let follow_service = FollowService::new(follow_repo, user_repo.clone(), notifications);
    let block_service = BlockService::new(block_repo, user_repo.clone());
    let report_service = ReportService::new(report_repo, user_repo);

    let state = AppState {
        user_service,
        post_service,
        like_service,
        comment_service,
        follow_service,
        block_service,
        report_service,
    };

    // Build router
    let app = Router::new()
        .nest("/api", api_router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            socialhub_api::middleware::auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}
