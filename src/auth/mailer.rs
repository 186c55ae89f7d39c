use async_trait::async_trait;
use tracing::info;

#[derive(Debug, Clone, PartialEq)]
pub struct OutboundEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Outbound notification channel for reset codes.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: OutboundEmail) -> anyhow::Result<()>;
}

/// Writes outgoing mail to the log instead of delivering it.
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: OutboundEmail) -> anyhow::Result<()> {
        info!(to = %email.to, subject = %email.subject, body = %email.body, "outbound email");
        Ok(())
    }
}

pub fn reset_code_email(to: &str, code: &str, ttl_minutes: i64) -> OutboundEmail {
    OutboundEmail {
        to: to.to_string(),
        subject: "Password reset".to_string(),
        body: format!(
            "Use the code {code} to reset your password. It expires in {ttl_minutes} minutes."
        ),
    }
}
