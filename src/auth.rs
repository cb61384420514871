use axum::{
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, header, request::Parts},
};

use crate::{
    error::AppError,
    policy::{self, AccessError},
    token::{Claims, TokenCodec, TokenError},
};

/// AuthUser Extractor Result
///
/// The resolved identity of an authenticated request. Built purely from the verified
/// token claims; no database round-trip happens on the request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: i32,
    pub role_id: i32,
    claims: Claims,
}

impl AuthUser {
    pub fn claims(&self) -> &Claims {
        &self.claims
    }

    /// Moderator-only gate.
    pub fn require_moderator(&self) -> Result<(), AccessError> {
        policy::moderator_only(&self.claims)
    }

    /// Author-or-moderator gate for a resource owned by `owner_id`.
    pub fn require_owner_or_moderator(&self, owner_id: i32) -> Result<(), AccessError> {
        policy::author_or_moderator(&self.claims, owner_id)
    }
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.user_id,
            role_id: claims.role_id,
            claims,
        }
    }
}

/// Pulls the token out of `Authorization: Bearer <token>`.
///
/// The scheme name is matched case-insensitively (RFC 7235).
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, TokenError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(TokenError::Missing)?
        .to_str()
        .map_err(|_| TokenError::Invalid)?;

    let (scheme, token) = value.split_once(' ').ok_or(TokenError::Invalid)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(TokenError::Invalid);
    }
    let token = token.trim();

    if token.is_empty() {
        return Err(TokenError::Invalid);
    }
    Ok(token)
}

/// AuthUser Extractor Implementation
///
/// Applies the authenticated-only gate to the incoming request. Every protected
/// handler, and the middleware guarding the authenticated router, goes through
/// this one implementation.
///
/// Rejection: 401 with a JSON body on a missing, malformed, forged or expired token.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    TokenCodec: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let codec = TokenCodec::from_ref(state);

        let decoded = bearer_token(&parts.headers).and_then(|token| codec.verify(token));
        let claims = policy::authenticated(decoded).inspect_err(|e| {
            tracing::debug!(reason = %e, "request rejected by authentication gate");
        })?;

        Ok(AuthUser::from(claims))
    }
}
