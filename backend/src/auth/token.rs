//! Admin token acquisition against the Keycloak token endpoint.

use std::time::{Duration, Instant};

use reqwest::Client;
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::config::KeycloakConfig;

/// Tokens are considered expired slightly before the upstream deadline.
const EXPIRY_MARGIN_SECS: u64 = 10;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Token request failed: {0}")]
    RequestFailed(String),
    #[error("Invalid token response: {0}")]
    InvalidResponse(String),
    #[error("Token endpoint returned {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Password-grant token response.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

/// Obtains and caches a bearer token for the Keycloak admin API.
///
/// The token is acquired with the OAuth2 password grant and reused
/// until shortly before its reported expiry.
pub struct TokenProvider {
    http_client: Client,
    token_url: String,
    client_id: String,
    username: String,
    password: String,
    cached: RwLock<Option<CachedToken>>,
}

impl TokenProvider {
    pub fn new(config: &KeycloakConfig) -> Self {
        let token_url = format!(
            "{}/realms/{}/protocol/openid-connect/token",
            config.base_url.trim_end_matches('/'),
            config.realm
        );
        Self {
            http_client: Client::new(),
            token_url,
            client_id: config.client_id.clone(),
            username: config.username.clone(),
            password: config.password.clone(),
            cached: RwLock::new(None),
        }
    }

    /// Return a valid bearer token, fetching a fresh one if the cached
    /// token is missing or expired.
    pub async fn bearer_token(&self) -> Result<String, AuthError> {
        {
            let cached = self.cached.read().await;
            if let Some(token) = cached.as_ref() {
                if Instant::now() < token.expires_at {
                    return Ok(token.access_token.clone());
                }
            }
        }

        let token = self.fetch_token().await?;

        let expires_at = Instant::now()
            + Duration::from_secs(token.expires_in.saturating_sub(EXPIRY_MARGIN_SECS));
        let mut cached = self.cached.write().await;
        *cached = Some(CachedToken {
            access_token: token.access_token.clone(),
            expires_at,
        });

        Ok(token.access_token)
    }

    async fn fetch_token(&self) -> Result<TokenResponse, AuthError> {
        tracing::debug!("Fetching admin token from {}", self.token_url);

        let response = self
            .http_client
            .post(&self.token_url)
            .form(&[
                ("grant_type", "password"),
                ("client_id", self.client_id.as_str()),
                ("username", self.username.as_str()),
                ("password", self.password.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AuthError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| AuthError::InvalidResponse(e.to_string()))
    }
}
