use std::sync::Arc;

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::auth::{jwt::JwtKeys, mailer::LogMailer, services::TokenAuthService, AuthService};
use crate::config::AppConfig;
use crate::federation::{GoogleClient, IdentityProvider};
use crate::users::{PgUserDirectory, UserDirectory};

/// Collaborators shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserDirectory>,
    pub auth: Arc<dyn AuthService>,
    pub identity: Arc<dyn IdentityProvider>,
}

impl AppState {
    /// Wire the production collaborators; returns the pool for migrations.
    pub async fn init(config: &AppConfig) -> anyhow::Result<(Self, PgPool)> {
        let db = PgPoolOptions::new()
            .max_connections(10)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;

        let users = Arc::new(PgUserDirectory::new(db.clone())) as Arc<dyn UserDirectory>;
        let auth = Arc::new(TokenAuthService::new(
            JwtKeys::from(&config.jwt),
            db.clone(),
            users.clone(),
            Arc::new(LogMailer),
            config.reset_code_ttl_minutes,
        )) as Arc<dyn AuthService>;
        let identity = Arc::new(GoogleClient::new(&config.google)?) as Arc<dyn IdentityProvider>;

        Ok((Self::from_parts(users, auth, identity), db))
    }

    pub fn from_parts(
        users: Arc<dyn UserDirectory>,
        auth: Arc<dyn AuthService>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            users,
            auth,
            identity,
        }
    }
}
