use crate::{
    AppState,
    auth::AuthUser,
    error::AppError,
    extract::{ApiJson, ApiPath},
    models::{
        ErrorBody, LoginRequest, NewUser, RegisterUserRequest, Role, TokenResponse, UserProfile,
    },
};
use axum::{Json, extract::State};

// --- Handlers ---

/// register_user
///
/// [Public Route] Creates a new identity. The password is hashed on the blocking pool
/// before it reaches the repository, and the response never includes the hash.
#[utoipa::path(
    post,
    path = "/api/register",
    request_body = RegisterUserRequest,
    responses(
        (status = 200, description = "Registered", body = UserProfile),
        (status = 409, description = "Name taken", body = ErrorBody),
        (status = 422, description = "Invalid input", body = ErrorBody)
    )
)]
pub async fn register_user(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RegisterUserRequest>,
) -> Result<Json<UserProfile>, AppError> {
    let name = payload.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::Validation("name must not be empty".into()));
    }
    if payload.password.is_empty() {
        return Err(AppError::Validation("password must not be empty".into()));
    }
    let role = Role::from_id(payload.role_id).ok_or_else(|| {
        AppError::Validation(format!("unknown role_id {}", payload.role_id))
    })?;

    if state.repo.find_user_by_name(&name).await?.is_some() {
        return Err(AppError::AlreadyExists);
    }

    let hasher = state.passwords.clone();
    let password = payload.password;
    let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let user = state
        .repo
        .create_user(NewUser {
            name,
            email: payload.email,
            password_hash,
            role_id: role.id(),
        })
        .await?;

    tracing::info!(user_id = user.id, role_id = user.role_id, "user registered");
    Ok(Json(user.into()))
}

/// login_user
///
/// [Public Route] Exchanges a name and password for a bearer token.
/// An unknown name is `404`, a wrong password is `400`.
#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = TokenResponse),
        (status = 400, description = "Wrong password", body = ErrorBody),
        (status = 404, description = "Unknown user", body = ErrorBody),
        (status = 422, description = "Malformed body", body = ErrorBody)
    )
)]
pub async fn login_user(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let user = state
        .repo
        .find_user_by_name(payload.name.trim())
        .await?
        .ok_or(AppError::NotFound)?;

    let hasher = state.passwords.clone();
    let stored = user.password_hash.clone();
    let password = payload.password;
    let matches = tokio::task::spawn_blocking(move || hasher.verify(&password, &stored))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    if !matches {
        tracing::info!(user_id = user.id, "login rejected: password mismatch");
        return Err(AppError::InvalidCredentials);
    }

    let token = state.tokens.issue(user.id, user.role_id)?;
    tracing::info!(user_id = user.id, "token issued");
    Ok(Json(TokenResponse { token }))
}

/// get_me
///
/// [Authenticated Route] Returns the caller's own profile.
#[utoipa::path(
    get,
    path = "/api/me",
    responses(
        (status = 200, description = "Profile", body = UserProfile),
        (status = 401, description = "Missing or invalid token", body = ErrorBody)
    )
)]
pub async fn get_me(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<UserProfile>, AppError> {
    let user = state.repo.get_user(auth.id).await?.ok_or(AppError::NotFound)?;
    Ok(Json(user.into()))
}

/// get_user
///
/// [Authenticated Route] Returns a profile to its owner or to a moderator.
///
/// The gate runs before the lookup so that non-owners cannot probe which ids exist.
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "Profile", body = UserProfile),
        (status = 403, description = "Not owner or moderator", body = ErrorBody),
        (status = 404, description = "Not Found", body = ErrorBody),
        (status = 422, description = "Id is not an integer", body = ErrorBody)
    )
)]
pub async fn get_user(
    auth: AuthUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<UserProfile>, AppError> {
    auth.require_owner_or_moderator(id)?;
    let user = state.repo.get_user(id).await?.ok_or(AppError::NotFound)?;
    Ok(Json(user.into()))
}

/// list_users
///
/// [Admin Route] Lists every registered identity. Moderators only.
#[utoipa::path(
    get,
    path = "/api/admin/users",
    responses(
        (status = 200, description = "All users", body = [UserProfile]),
        (status = 403, description = "Not a moderator", body = ErrorBody)
    )
)]
pub async fn list_users(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<UserProfile>>, AppError> {
    auth.require_moderator()?;
    let users = state.repo.list_users().await?;
    Ok(Json(users.into_iter().map(UserProfile::from).collect()))
}
