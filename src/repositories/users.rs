use crate::models::users::User;

use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum CredentialStoreError {
    #[error("user name already exists")]
    DuplicateName,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("credential hashing failed: {0}")]
    Hasher(#[from] bcrypt::BcryptError),
    #[error("store unavailable: {0}")]
    Unavailable(#[from] sqlx::Error),
}

/// Password digest capability injected into the repository. The store only
/// ever sees digests; the comparison at login time is a digest verification,
/// not a plaintext equality.
pub trait CredentialHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, CredentialStoreError>;
    fn verify(&self, digest: &str, password: &str) -> Result<bool, CredentialStoreError>;
}

pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    pub fn new(cost: u32) -> Self {
        BcryptHasher { cost }
    }
}

impl Default for BcryptHasher {
    fn default() -> Self {
        BcryptHasher::new(bcrypt::DEFAULT_COST)
    }
}

impl CredentialHasher for BcryptHasher {
    fn hash(&self, password: &str) -> Result<String, CredentialStoreError> {
        Ok(bcrypt::hash(password, self.cost)?)
    }

    fn verify(&self, digest: &str, password: &str) -> Result<bool, CredentialStoreError> {
        Ok(bcrypt::verify(password, digest)?)
    }
}

#[derive(Clone)]
pub struct UserRepository {
    conn: PgPool,
    hasher: Arc<dyn CredentialHasher>,
}

impl UserRepository {
    pub fn new(conn: PgPool, hasher: Arc<dyn CredentialHasher>) -> Self {
        Self { conn, hasher }
    }

    /// Single INSERT relying on the unique constraint on `users.name`; no
    /// query-then-insert, so concurrent signups with the same name cannot
    /// race past the check.
    pub async fn create_user(
        &self,
        name: &str,
        password: &str,
    ) -> Result<User, CredentialStoreError> {
        let user_id = Uuid::new_v4().hyphenated().to_string();
        let password_hash = self.hasher.hash(password)?;

        let user = sqlx::query_as::<_, User>(
            r#"
                INSERT INTO users (id, name, password_hash)
                VALUES ($1, $2, $3)
                RETURNING id, name, password_hash, created_at
            "#,
        )
        .bind(&user_id)
        .bind(name)
        .bind(&password_hash)
        .fetch_one(&self.conn)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                CredentialStoreError::DuplicateName
            } else {
                CredentialStoreError::Unavailable(e)
            }
        })?;

        Ok(user)
    }

    pub async fn verify_user(
        &self,
        name: &str,
        password: &str,
    ) -> Result<User, CredentialStoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, password_hash, created_at FROM users WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(&self.conn)
        .await?;

        let Some(user) = user else {
            return Err(CredentialStoreError::InvalidCredentials);
        };

        if self.hasher.verify(&user.password_hash, password)? {
            Ok(user)
        } else {
            Err(CredentialStoreError::InvalidCredentials)
        }
    }
}

// Postgres SQLSTATE for unique_violation.
fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db) if db.code().as_deref() == Some("23505")
    )
}
