//! HTTP API layer for socialhub.
//!
//! - **Endpoints**: JSON API under `/api`, POST-oriented
//! - **Extractors**: bearer-token authentication
//! - **Middleware**: token resolution, logging, CORS

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::AppState;
