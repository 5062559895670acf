//! JWT authentication against the destination site.
//!
//! One token is fetched per import run and held for the run's duration; no
//! caching across runs and no mid-run refresh.

use std::time::Duration;

use serde_json::{json, Value};

use super::error::AuthError;
use super::{token_url, DestConfig};

/// Timeout for the token exchange request.
const AUTH_TIMEOUT: Duration = Duration::from_secs(30);

/// Longest response-body excerpt carried in error messages.
const ERROR_BODY_SNIPPET: usize = 200;

/// Seam between the orchestrator and the token endpoint.
#[async_trait::async_trait]
pub trait TokenProvider: Send + Sync {
    async fn fetch_token(&self) -> Result<String, AuthError>;
}

/// HTTP-backed provider hitting the site's `jwt-auth` token endpoint.
pub struct JwtAuthenticator {
    client: reqwest::Client,
    url: String,
    username: String,
    password: String,
}

impl JwtAuthenticator {
    pub fn new(client: reqwest::Client, config: &DestConfig) -> Self {
        Self {
            client,
            url: token_url(&config.base_url),
            username: config.username.clone(),
            password: config.password.clone(),
        }
    }
}

impl std::fmt::Debug for JwtAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtAuthenticator")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[async_trait::async_trait]
impl TokenProvider for JwtAuthenticator {
    async fn fetch_token(&self) -> Result<String, AuthError> {
        tracing::debug!("POST {}", self.url);

        let response = self
            .client
            .post(&self.url)
            .json(&json!({
                "username": self.username,
                "password": self.password,
            }))
            .timeout(AUTH_TIMEOUT)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        if status != 200 {
            return Err(AuthError::Status {
                status,
                body: body.chars().take(ERROR_BODY_SNIPPET).collect(),
            });
        }

        let value: Value = serde_json::from_str(&body)?;
        value
            .get("token")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or(AuthError::MissingToken)
    }
}
