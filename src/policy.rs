//! Authorization gates.
//!
//! Every protected endpoint admits or rejects its caller through one of these three
//! predicates. They are pure: ownership facts are supplied by the caller and nothing
//! is looked up or remembered between evaluations.

use thiserror::Error;

use crate::{
    models::Role,
    token::{Claims, TokenError},
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    /// No usable token: missing, malformed, badly signed or expired.
    #[error("unauthorized: {0}")]
    Unauthorized(TokenError),
    /// A valid token whose role or ownership does not cover the resource.
    #[error("forbidden")]
    Forbidden,
}

/// Admits any caller whose token decoded and has not expired, regardless of role.
pub fn authenticated(decoded: Result<Claims, TokenError>) -> Result<Claims, AccessError> {
    decoded.map_err(AccessError::Unauthorized)
}

/// Admits the owner of a resource, or any moderator.
pub fn author_or_moderator(claims: &Claims, owner_id: i32) -> Result<(), AccessError> {
    if claims.user_id == owner_id || is_moderator(claims) {
        Ok(())
    } else {
        Err(AccessError::Forbidden)
    }
}

/// Admits moderators only.
pub fn moderator_only(claims: &Claims) -> Result<(), AccessError> {
    if is_moderator(claims) {
        Ok(())
    } else {
        Err(AccessError::Forbidden)
    }
}

fn is_moderator(claims: &Claims) -> bool {
    claims.role() == Some(Role::Moderator)
}
