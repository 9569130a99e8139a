use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::password;
use crate::db;
use crate::error::AppError;
use crate::models::Identity;

#[derive(Debug)]
pub enum IdentityError {
    /// An identity with this email already exists.
    EmailTaken,
    Hash(String),
    Database(sqlx::Error),
}

impl std::fmt::Display for IdentityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IdentityError::EmailTaken => write!(f, "email already registered"),
            IdentityError::Hash(msg) => write!(f, "password hashing failed: {msg}"),
            IdentityError::Database(err) => write!(f, "identity store error: {err}"),
        }
    }
}

impl From<IdentityError> for AppError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::EmailTaken => {
                AppError::Conflict("Já existe um usuário com este email".to_string())
            }
            IdentityError::Hash(msg) => AppError::Internal(msg),
            IdentityError::Database(e) => AppError::Database(e),
        }
    }
}

/// Seam over the authentication backend. Provisioning only ever creates and
/// deletes identities through this trait.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn create(&self, email: &str, password: &str) -> Result<Identity, IdentityError>;
    async fn delete(&self, id: Uuid) -> Result<(), IdentityError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, IdentityError>;
}

/// Identity provider backed by the local `identities` table.
pub struct PgIdentityProvider {
    pool: PgPool,
}

impl PgIdentityProvider {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IdentityProvider for PgIdentityProvider {
    async fn create(&self, email: &str, password: &str) -> Result<Identity, IdentityError> {
        let password_hash = password::hash(password).map_err(IdentityError::Hash)?;
        db::identities::create(&self.pool, email, &password_hash)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                    IdentityError::EmailTaken
                }
                _ => IdentityError::Database(e),
            })
    }

    async fn delete(&self, id: Uuid) -> Result<(), IdentityError> {
        db::identities::delete(&self.pool, id)
            .await
            .map_err(IdentityError::Database)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, IdentityError> {
        db::identities::find_by_email(&self.pool, email)
            .await
            .map_err(IdentityError::Database)
    }
}
