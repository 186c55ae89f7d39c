//! In-memory collaborators for handler tests. Each fake records its calls.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::auth::mailer::{Mailer, OutboundEmail};
use crate::auth::AuthService;
use crate::federation::{dto::GooglePerson, FederatedProfile, IdentityProvider, ProviderError};
use crate::users::{DirectoryError, User, UserDirectory};

#[derive(Default)]
pub struct DirectoryCalls {
    pub lookups: usize,
    pub creates: usize,
    pub updates: usize,
    pub password_updates: Vec<(i64, String)>,
}

#[derive(Default)]
pub struct FakeDirectory {
    pub users: Mutex<HashMap<String, User>>,
    pub calls: Mutex<DirectoryCalls>,
    pub fail_lookup: bool,
    pub fail_create: bool,
    pub fail_update: bool,
    pub fail_password: bool,
}

impl FakeDirectory {
    pub fn with_user(user: User) -> Self {
        let dir = Self::default();
        dir.users.lock().unwrap().insert(user.email.clone(), user);
        dir
    }

    /// Case-insensitive, like the Postgres directory's `lower(email)` match.
    pub fn stored(&self, email: &str) -> Option<User> {
        self.users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned()
    }

    fn storage_error() -> DirectoryError {
        DirectoryError::Database(sqlx::Error::PoolTimedOut)
    }
}

#[async_trait]
impl UserDirectory for FakeDirectory {
    async fn get_by_email(&self, email: &str) -> Result<User, DirectoryError> {
        self.calls.lock().unwrap().lookups += 1;
        if self.fail_lookup {
            return Err(Self::storage_error());
        }
        self.stored(email).ok_or(DirectoryError::NotFound)
    }

    async fn create(&self, user: &User) -> Result<i64, DirectoryError> {
        self.calls.lock().unwrap().creates += 1;
        if self.fail_create {
            return Err(Self::storage_error());
        }
        let mut users = self.users.lock().unwrap();
        let id = 100 + users.len() as i64;
        users.insert(user.email.clone(), User { id, ..user.clone() });
        Ok(id)
    }

    async fn update(&self, id: i64, user: &User) -> Result<(), DirectoryError> {
        self.calls.lock().unwrap().updates += 1;
        if self.fail_update {
            return Err(Self::storage_error());
        }
        let mut users = self.users.lock().unwrap();
        match users.values_mut().find(|u| u.id == id) {
            Some(stored) => {
                *stored = User { id, ..user.clone() };
                Ok(())
            }
            None => Err(DirectoryError::NotFound),
        }
    }

    async fn update_password(&self, id: i64, password: &str) -> Result<(), DirectoryError> {
        self.calls
            .lock()
            .unwrap()
            .password_updates
            .push((id, password.to_string()));
        if self.fail_password {
            return Err(Self::storage_error());
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeAuth {
    /// Live reset codes by user id; verification consumes them.
    pub codes: Mutex<HashMap<i64, String>>,
    pub reset_requests: Mutex<Vec<String>>,
    pub verify_calls: Mutex<usize>,
    pub minted_for: Mutex<Vec<i64>>,
    pub fail_send: bool,
    pub fail_mint: bool,
}

impl FakeAuth {
    pub fn with_code(user_id: i64, code: &str) -> Self {
        let auth = Self::default();
        auth.codes.lock().unwrap().insert(user_id, code.to_string());
        auth
    }
}

#[async_trait]
impl AuthService for FakeAuth {
    async fn mint_session_token(&self, user_id: i64) -> anyhow::Result<String> {
        self.minted_for.lock().unwrap().push(user_id);
        if self.fail_mint {
            anyhow::bail!("signing key unavailable");
        }
        Ok(format!("session-{user_id}"))
    }

    async fn send_password_reset_code(&self, email: &str) -> anyhow::Result<()> {
        self.reset_requests.lock().unwrap().push(email.to_string());
        if self.fail_send {
            anyhow::bail!("mail relay down");
        }
        Ok(())
    }

    async fn verify_password_reset_code(&self, user_id: i64, code: &str) -> bool {
        *self.verify_calls.lock().unwrap() += 1;
        let mut codes = self.codes.lock().unwrap();
        if codes.get(&user_id).is_some_and(|c| c == code) {
            codes.remove(&user_id);
            return true;
        }
        false
    }
}

#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<OutboundEmail>>,
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: OutboundEmail) -> anyhow::Result<()> {
        self.sent.lock().unwrap().push(email);
        Ok(())
    }
}

pub enum ProviderReply {
    Profile(FederatedProfile),
    Rejected,
    Garbage,
}

pub struct FakeProvider {
    pub reply: ProviderReply,
    pub calls: Mutex<Vec<String>>,
}

impl FakeProvider {
    pub fn new(reply: ProviderReply) -> Self {
        Self {
            reply,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl IdentityProvider for FakeProvider {
    async fn fetch_profile(&self, bearer_token: &str) -> Result<FederatedProfile, ProviderError> {
        self.calls.lock().unwrap().push(bearer_token.to_string());
        match &self.reply {
            ProviderReply::Profile(p) => Ok(p.clone()),
            ProviderReply::Rejected => Err(ProviderError::Status(StatusCode::UNAUTHORIZED)),
            ProviderReply::Garbage => Err(ProviderError::Parse(
                serde_json::from_str::<GooglePerson>("<html>").unwrap_err(),
            )),
        }
    }
}
