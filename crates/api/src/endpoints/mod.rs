//! API endpoints.

mod account;
mod blocking;
mod comments;
mod following;
mod posts;
mod users;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/account", account::router())
        .nest("/users", users::router())
        .nest("/posts", posts::router())
        .nest("/comments", comments::router())
        .nest("/following", following::router())
        .nest("/blocking", blocking::router())
}
