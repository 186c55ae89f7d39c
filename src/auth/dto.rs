use serde::Deserialize;

use crate::users::{is_valid_email, normalize_email};

/// Request body for `POST /reset-password`.
#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub email: String,
}

/// Request body for `PUT /reset-password`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPassword {
    pub email: String,
    pub password: String,
    pub reset_code: String,
}

impl ResetPasswordRequest {
    /// Normalized email, if present and well formed.
    pub fn email(&self) -> Option<String> {
        let email = normalize_email(&self.email);
        is_valid_email(&email).then_some(email)
    }
}

impl ResetPassword {
    /// Reject blank fields, naming the first one found.
    pub fn validate(mut self) -> Result<Self, String> {
        self.email = normalize_email(&self.email);
        for (name, value) in [
            ("email", &self.email),
            ("password", &self.password),
            ("resetCode", &self.reset_code),
        ] {
            if value.trim().is_empty() {
                return Err(format!("missing field `{name}`"));
            }
        }
        Ok(self)
    }
}
