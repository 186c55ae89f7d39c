use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use rand::{distributions::Alphanumeric, Rng};
use sqlx::PgPool;
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::{debug, error, info, warn};

use super::jwt::JwtKeys;
use super::mailer::{reset_code_email, Mailer};
use super::repo;
use crate::users::{
    password::{hash_password, verify_password},
    DirectoryError, UserDirectory,
};

pub const RESET_CODE_LEN: usize = 10;

/// Session tokens and the one-time reset code handshake.
#[async_trait]
pub trait AuthService: Send + Sync {
    async fn mint_session_token(&self, user_id: i64) -> anyhow::Result<String>;

    /// Issue a reset code for `email` and dispatch it. Unknown emails succeed
    /// without sending anything.
    async fn send_password_reset_code(&self, email: &str) -> anyhow::Result<()>;

    /// True only for a live code of `user_id`; a matching code is consumed.
    async fn verify_password_reset_code(&self, user_id: i64, code: &str) -> bool;
}

pub fn generate_reset_code() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(RESET_CODE_LEN)
        .map(char::from)
        .collect()
}

/// Id of the first `(id, hash)` pair whose hash matches `code`.
fn find_matching_code(code: &str, live: &[(i64, String)]) -> anyhow::Result<Option<i64>> {
    for (code_id, hash) in live {
        if verify_password(code, hash)? {
            return Ok(Some(*code_id));
        }
    }
    Ok(None)
}

pub struct TokenAuthService {
    keys: JwtKeys,
    db: PgPool,
    users: Arc<dyn UserDirectory>,
    mailer: Arc<dyn Mailer>,
    code_ttl_minutes: i64,
}

impl TokenAuthService {
    pub fn new(
        keys: JwtKeys,
        db: PgPool,
        users: Arc<dyn UserDirectory>,
        mailer: Arc<dyn Mailer>,
        code_ttl_minutes: i64,
    ) -> Self {
        Self {
            keys,
            db,
            users,
            mailer,
            code_ttl_minutes,
        }
    }

    async fn check_code(&self, user_id: i64, code: &str) -> anyhow::Result<bool> {
        let live = repo::list_live_codes(&self.db, user_id).await?;
        match find_matching_code(code, &live)? {
            Some(code_id) => repo::consume_code(&self.db, code_id).await,
            None => Ok(false),
        }
    }
}

#[async_trait]
impl AuthService for TokenAuthService {
    async fn mint_session_token(&self, user_id: i64) -> anyhow::Result<String> {
        self.keys.sign(user_id)
    }

    async fn send_password_reset_code(&self, email: &str) -> anyhow::Result<()> {
        let user = match self.users.get_by_email(email).await {
            Ok(u) => u,
            Err(DirectoryError::NotFound) => {
                // same hashing cost as the known-email path
                hash_password(&generate_reset_code())?;
                info!(email = %email, "reset requested for unknown email");
                return Ok(());
            }
            Err(e) => return Err(e).context("look up user for reset"),
        };

        let code = generate_reset_code();
        let hash = hash_password(&code)?;
        let expires_at = OffsetDateTime::now_utc() + TimeDuration::minutes(self.code_ttl_minutes);

        let mut tx = self.db.begin().await.context("begin tx")?;
        let replaced = repo::consume_open_codes_tx(&mut tx, user.id).await?;
        repo::insert_code_tx(&mut tx, user.id, &hash, expires_at).await?;
        tx.commit().await.context("commit tx")?;
        debug!(user_id = user.id, replaced, "reset code stored");

        self.mailer
            .send(reset_code_email(&user.email, &code, self.code_ttl_minutes))
            .await
            .context("dispatch reset code")?;
        info!(user_id = user.id, "reset code sent");
        Ok(())
    }

    async fn verify_password_reset_code(&self, user_id: i64, code: &str) -> bool {
        match self.check_code(user_id, code).await {
            Ok(true) => true,
            Ok(false) => {
                warn!(user_id, "reset code rejected");
                false
            }
            Err(e) => {
                error!(error = %e, user_id, "reset code verification failed");
                false
            }
        }
    }
}
