use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{config::AppConfig, models::Role};

/// Claims
///
/// The payload signed into every bearer token. Nothing here is persisted; the
/// claims are rebuilt from the token on each request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i32,
    pub role_id: i32,
    /// Issued At, Unix seconds.
    pub iat: i64,
    /// Expiration Time, Unix seconds. Always strictly after `iat`.
    pub exp: i64,
}

impl Claims {
    /// The decoded role, or `None` if the token carries an id outside the closed set.
    pub fn role(&self) -> Option<Role> {
        Role::from_id(self.role_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("missing bearer credentials")]
    Missing,
    #[error("invalid token")]
    Invalid,
    #[error("token expired")]
    Expired,
    #[error("token signing failed: {0}")]
    Signing(String),
}

struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

/// TokenCodec
///
/// Issues and verifies HS256 bearer tokens. Built once from `AppConfig` and shared
/// through the application state; cloning only bumps a reference count.
///
/// Rotating the secret invalidates every token already handed out.
#[derive(Clone)]
pub struct TokenCodec {
    keys: Arc<Keys>,
    ttl: Duration,
}

impl TokenCodec {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        assert!(ttl > Duration::zero(), "token ttl must be positive");
        Self {
            keys: Arc::new(Keys {
                encoding: EncodingKey::from_secret(secret.as_bytes()),
                decoding: DecodingKey::from_secret(secret.as_bytes()),
            }),
            ttl,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(&config.jwt_secret, Duration::minutes(config.token_ttl_minutes))
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn issue(&self, user_id: i32, role_id: i32) -> Result<String, TokenError> {
        self.issue_at(user_id, role_id, Utc::now())
    }

    /// Issues a token as if the current time were `now`.
    pub fn issue_at(
        &self,
        user_id: i32,
        role_id: i32,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let claims = Claims {
            user_id,
            role_id,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.keys.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Verifies the signature and structure of `token`, then checks expiry against `now`.
    ///
    /// Expiry is checked here rather than by the jsonwebtoken validator so that the
    /// boundary is exact (no leeway) and the clock can be supplied by the caller.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;

        let claims = match decode::<Claims>(token, &self.keys.decoding, &validation) {
            Ok(data) => data.claims,
            Err(e) => {
                tracing::debug!(kind = ?e.kind(), "bearer token rejected");
                return Err(TokenError::Invalid);
            }
        };

        if claims.exp <= claims.iat {
            return Err(TokenError::Invalid);
        }
        if now.timestamp() >= claims.exp {
            return Err(TokenError::Expired);
        }
        Ok(claims)
    }
}
