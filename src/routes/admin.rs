use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Admin Router Module
///
/// Moderator tooling, nested under `/api/admin`. Non-moderators with a valid token
/// receive 403 from the moderator-only gate in the handler.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // GET /api/admin/users
        // Every registered identity, without password hashes.
        .route("/users", get(handlers::list_users))
}
