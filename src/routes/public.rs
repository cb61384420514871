use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Endpoints that need no token. Registration and login are the only way to obtain one.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness probe for load balancers; touches neither the database nor auth.
        .route("/health", get(|| async { "ok" }))
        // POST /api/register
        // Creates an identity. Duplicate names are rejected with 409.
        .route("/api/register", post(handlers::register_user))
        // POST /api/login
        // Verifies the password and returns a signed, time-limited bearer token.
        .route("/api/login", post(handlers::login_user))
}
