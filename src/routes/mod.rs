/// HTTP handlers and the response envelope
use axum::{routing::get, Router};

pub mod extract;
pub mod health;
pub mod response;
pub mod users;

use users::users_router;

/// Versioned API routes, mounted under `/api/v1` by the server.
pub fn api_router() -> Router {
    Router::new()
        .route("/health", get(health::health))
        .nest("/users", users_router())
}
