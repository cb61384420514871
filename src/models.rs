use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;

// --- Roles ---

/// Role
///
/// The closed set of authorization tiers. The numeric ids are shared with the
/// `roles` table and embedded in every token, so they must never be renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Standard = 1,
    Author = 2,
    Moderator = 3,
}

impl Role {
    pub fn id(self) -> i32 {
        self as i32
    }

    pub fn from_id(id: i32) -> Option<Self> {
        match id {
            1 => Some(Role::Standard),
            2 => Some(Role::Author),
            3 => Some(Role::Moderator),
            _ => None,
        }
    }
}

// --- Core Application Schemas (Mapped to Database) ---

/// User
///
/// A row of the `users` table. Carries the password hash, so it is deliberately
/// not `Serialize`: convert to `UserProfile` before it leaves the service.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i32,
    // Unique login name.
    pub name: String,
    pub email: String,
    // Argon2 PHC string. The column keeps its historical name.
    #[sqlx(rename = "password")]
    pub password_hash: String,
    pub role_id: i32,
    pub created_at: DateTime<Utc>,
}

/// NewUser
///
/// Insert payload for the Credential Store. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role_id: i32,
}

// --- Request Payloads (Input Schemas) ---

/// RegisterUserRequest
///
/// Input payload for the public registration endpoint (POST /api/register).
/// The password is hashed before it reaches the repository and is never logged.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct RegisterUserRequest {
    #[schema(example = "alice")]
    pub name: String,
    #[schema(example = "alice@example.com")]
    pub email: String,
    pub password: String,
    /// 1 = standard, 2 = author, 3 = moderator.
    #[schema(example = 1)]
    pub role_id: i32,
}

/// LoginRequest
///
/// Input payload for POST /api/login.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct LoginRequest {
    pub name: String,
    pub password: String,
}

// --- Output Schemas ---

/// TokenResponse
///
/// Returned by a successful login. The token goes into `Authorization: Bearer <token>`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct TokenResponse {
    pub token: String,
}

/// UserProfile
///
/// The public view of a `User`: everything except the password hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct UserProfile {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role_id: i32,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role_id: user.role_id,
            created_at: user.created_at,
        }
    }
}

/// ErrorBody
///
/// Uniform JSON body for every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub detail: String,
}
