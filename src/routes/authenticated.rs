use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Authenticated Router Module
///
/// Routes for any caller holding a valid token, whatever their role. The router is
/// wrapped in the authentication middleware in `create_router`, and each handler
/// also takes `AuthUser` to get at the caller's identity.
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // GET /api/me
        // The caller's own profile.
        .route("/api/me", get(handlers::get_me))
        // GET /api/users/{id}
        // A profile, visible to its owner and to moderators (author-or-moderator gate).
        .route("/api/users/{id}", get(handlers::get_user))
}
