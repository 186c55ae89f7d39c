use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;
use tracing::{debug, warn};

use super::dto::{FederatedProfile, GooglePerson};
use crate::config::GoogleConfig;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("provider answered {0}")]
    Status(StatusCode),
    #[error("provider response did not parse: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Resolves a provider-issued bearer token into the caller's profile.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn fetch_profile(&self, bearer_token: &str) -> Result<FederatedProfile, ProviderError>;
}

#[derive(Clone)]
pub struct GoogleClient {
    client: reqwest::Client,
    profile_url: String,
}

impl GoogleClient {
    pub fn new(config: &GoogleConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("build google http client")?;
        Ok(Self {
            client,
            profile_url: config.profile_url.clone(),
        })
    }
}

#[async_trait]
impl IdentityProvider for GoogleClient {
    async fn fetch_profile(&self, bearer_token: &str) -> Result<FederatedProfile, ProviderError> {
        let res = self
            .client
            .get(&self.profile_url)
            .bearer_auth(bearer_token)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            warn!(%status, "google profile request rejected");
            return Err(ProviderError::Status(status));
        }

        let body = res.bytes().await?;
        let person: GooglePerson = serde_json::from_slice(&body).map_err(|e| {
            warn!(error = %e, body = %String::from_utf8_lossy(&body), "error unmarshaling google profile");
            ProviderError::Parse(e)
        })?;
        debug!(external_id = %person.id, "google profile fetched");
        Ok(person.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::HeaderMap, routing::get, Router};

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}/people/me", addr)
    }

    fn client(profile_url: String) -> GoogleClient {
        GoogleClient::new(&GoogleConfig {
            profile_url,
            timeout_secs: 2,
        })
        .expect("client builds")
    }

    #[tokio::test]
    async fn sends_bearer_token_and_maps_profile() {
        let router = Router::new().route(
            "/people/me",
            get(|headers: HeaderMap| async move {
                let auth = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                if auth != "Bearer good-token" {
                    return (axum::http::StatusCode::UNAUTHORIZED, String::new());
                }
                (
                    axum::http::StatusCode::OK,
                    r#"{"id":"1","displayName":"Ada","emails":[{"value":"ada@example.com"}],
                        "image":{"url":"http://x/pic?sz=50"},"ageRange":{"min":21,"max":99}}"#
                        .to_string(),
                )
            }),
        );
        let google = client(serve(router).await);

        let profile = google.fetch_profile("good-token").await.expect("profile");
        assert_eq!(profile.primary_email(), Some("ada@example.com"));
        assert_eq!(profile.display_name, "Ada");

        let err = google.fetch_profile("bad-token").await.unwrap_err();
        assert!(matches!(err, ProviderError::Status(s) if s == StatusCode::UNAUTHORIZED));
    }

    #[tokio::test]
    async fn unparseable_body_is_a_parse_error() {
        let router = Router::new().route("/people/me", get(|| async { "not json" }));
        let google = client(serve(router).await);
        let err = google.fetch_profile("token").await.unwrap_err();
        assert!(matches!(err, ProviderError::Parse(_)));
    }

    #[tokio::test]
    async fn unreachable_provider_is_a_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let google = client(format!("http://{}/people/me", addr));
        let err = google.fetch_profile("token").await.unwrap_err();
        assert!(matches!(err, ProviderError::Transport(_)));
    }
}
