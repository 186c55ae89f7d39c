use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use tracing::debug;

use super::password::hash_password;
use super::repo_types::User;

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("user not found")]
    NotFound,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("password hashing failed: {0}")]
    Hash(#[source] anyhow::Error),
}

/// Lookup and persistence of user records, addressed by email until an id exists.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn get_by_email(&self, email: &str) -> Result<User, DirectoryError>;

    /// Insert a new user and return its id.
    async fn create(&self, user: &User) -> Result<i64, DirectoryError>;

    async fn update(&self, id: i64, user: &User) -> Result<(), DirectoryError>;

    /// Replace the credential; `password` is plaintext and gets hashed here.
    async fn update_password(&self, id: i64, password: &str) -> Result<(), DirectoryError>;
}

#[derive(Clone)]
pub struct PgUserDirectory {
    db: PgPool,
}

impl PgUserDirectory {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    async fn get_by_email(&self, email: &str) -> Result<User, DirectoryError> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, full_name, photo, min_age, max_age, password_hash, is_admin, created_at
            FROM users
            WHERE lower(email) = lower($1)
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?
        .ok_or(DirectoryError::NotFound)
    }

    async fn create(&self, user: &User) -> Result<i64, DirectoryError> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO users (email, full_name, photo, min_age, max_age, password_hash, is_admin)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(&user.email)
        .bind(&user.full_name)
        .bind(&user.photo)
        .bind(user.min_age)
        .bind(user.max_age)
        .bind(&user.password_hash)
        .bind(user.is_admin)
        .fetch_one(&self.db)
        .await?;
        debug!(user_id = id, "user created");
        Ok(id)
    }

    async fn update(&self, id: i64, user: &User) -> Result<(), DirectoryError> {
        let res = sqlx::query(
            r#"
            UPDATE users
               SET email = $2, full_name = $3, photo = $4, min_age = $5, max_age = $6, is_admin = $7
             WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&user.email)
        .bind(&user.full_name)
        .bind(&user.photo)
        .bind(user.min_age)
        .bind(user.max_age)
        .bind(user.is_admin)
        .execute(&self.db)
        .await?;
        if res.rows_affected() == 0 {
            return Err(DirectoryError::NotFound);
        }
        Ok(())
    }

    async fn update_password(&self, id: i64, password: &str) -> Result<(), DirectoryError> {
        let hash = hash_password(password).map_err(DirectoryError::Hash)?;
        let res = sqlx::query(r#"UPDATE users SET password_hash = $2 WHERE id = $1"#)
            .bind(id)
            .bind(hash)
            .execute(&self.db)
            .await?;
        if res.rows_affected() == 0 {
            return Err(DirectoryError::NotFound);
        }
        debug!(user_id = id, "password updated");
        Ok(())
    }
}
