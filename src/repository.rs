use crate::models::{NewUser, User};
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    /// A uniqueness constraint rejected the write (e.g. a duplicate user name).
    #[error("unique constraint violated")]
    Conflict,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Repository Trait
///
/// The Credential Store contract. Handlers only ever see this trait, so tests can
/// swap the Postgres implementation for an in-memory one.
///
/// **Send + Sync + async_trait** are required to make the trait object (`Arc<dyn Repository>`)
/// safely shareable across Axum's asynchronous task boundaries.
#[async_trait]
pub trait Repository: Send + Sync {
    async fn find_user_by_name(&self, name: &str) -> Result<Option<User>, RepositoryError>;
    async fn get_user(&self, id: i32) -> Result<Option<User>, RepositoryError>;
    /// Inserts a user. Fails with `Conflict` if the name is already taken.
    async fn create_user(&self, user: NewUser) -> Result<User, RepositoryError>;
    async fn list_users(&self) -> Result<Vec<User>, RepositoryError>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the application state.
pub type RepositoryState = Arc<dyn Repository>;

/// PostgresRepository
///
/// The concrete implementation of the `Repository` trait, backed by PostgreSQL.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const USER_COLUMNS: &str = "id, name, email, password, role_id, created_at";

#[async_trait]
impl Repository for PostgresRepository {
    async fn find_user_by_name(&self, name: &str) -> Result<Option<User>, RepositoryError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE name = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("find_user_by_name error: {:?}", e);
                e.into()
            })
    }

    async fn get_user(&self, id: i32) -> Result<Option<User>, RepositoryError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("get_user error: {:?}", e);
                e.into()
            })
    }

    /// create_user
    ///
    /// The handler pre-checks the name, but two concurrent registrations can both pass
    /// that check; the `UNIQUE` constraint settles the race and surfaces as `Conflict`.
    async fn create_user(&self, user: NewUser) -> Result<User, RepositoryError> {
        let query = format!(
            "INSERT INTO users (name, email, password, role_id) VALUES ($1, $2, $3, $4) RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.role_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                    RepositoryError::Conflict
                }
                e => {
                    tracing::error!("create_user error: {:?}", e);
                    e.into()
                }
            })
    }

    async fn list_users(&self) -> Result<Vec<User>, RepositoryError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users ORDER BY id ASC");
        sqlx::query_as::<_, User>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("list_users error: {:?}", e);
                e.into()
            })
    }
}
