use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

/// User record in the database.
#[derive(Debug, Clone, Default, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64, // 0 until persisted
    pub email: String,
    pub full_name: String,
    pub photo: String,
    pub min_age: i32,
    pub max_age: i32,
    #[serde(skip_serializing)]
    pub password_hash: String, // Argon2 hash, not exposed in JSON
    pub is_admin: bool,
    #[serde(with = "time::serde::rfc3339::option")]
    #[sqlx(rename = "created_at")]
    pub created: Option<OffsetDateTime>,
}

impl User {
    /// Unsaved user seeded with an email.
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            ..Self::default()
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.id != 0
    }
}
