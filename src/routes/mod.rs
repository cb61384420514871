/// Router Module Index
///
/// Splits the routing table by access tier so that the gate protecting each group is
/// applied once, at the router layer, instead of being remembered per handler.

/// Routes accessible to anonymous clients: health, registration and login.
pub mod public;

/// Routes protected by the `AuthUser` extractor middleware.
/// Requires a valid, unexpired bearer token.
pub mod authenticated;

/// Routes restricted to moderators. The moderator-only gate runs inside each handler
/// after the request has passed the authentication layer.
pub mod admin;
