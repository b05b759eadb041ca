//! Client for the Keycloak admin users API.

use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::config::KeycloakConfig;
use crate::keycloak::query::UserQuery;
use crate::models::user::UserRecord;

#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Upstream returned {status}: {body}")]
    Status { status: u16, body: String },
}

impl UpstreamError {
    /// Upstream HTTP status, when the failure carries one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            UpstreamError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Read-only client for the admin user-management REST API.
pub struct KeycloakClient {
    http_client: Client,
    base_url: String,
    users_realm: String,
}

impl KeycloakClient {
    pub fn new(config: &KeycloakConfig) -> Self {
        Self {
            http_client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            users_realm: config.users_realm.clone(),
        }
    }

    fn users_url(&self) -> String {
        format!("{}/admin/realms/{}/users", self.base_url, self.users_realm)
    }

    /// One page of users under the query's filters.
    pub async fn list_users(
        &self,
        token: &str,
        query: &UserQuery,
    ) -> Result<Vec<UserRecord>, UpstreamError> {
        self.get_json(&self.users_url(), token, &query.list_params())
            .await
    }

    /// Total user count under the query's filters, for page-count
    /// computation.
    pub async fn count_users(&self, token: &str, query: &UserQuery) -> Result<u64, UpstreamError> {
        let url = format!("{}/count", self.users_url());
        self.get_json(&url, token, &query.count_params()).await
    }

    /// The entire user set of the realm, unfiltered.
    pub async fn fetch_all_users(&self, token: &str) -> Result<Vec<UserRecord>, UpstreamError> {
        self.get_json(&self.users_url(), token, &[]).await
    }

    /// Full representation of a single user.
    pub async fn fetch_user(&self, token: &str, user_id: &str) -> Result<UserRecord, UpstreamError> {
        let url = format!("{}/{}", self.users_url(), user_id);
        self.get_json(&url, token, &[]).await
    }

    /// Brief representation of a single user. Carries the update
    /// timestamp without the attribute payload, for freshness checks.
    pub async fn fetch_user_brief(
        &self,
        token: &str,
        user_id: &str,
    ) -> Result<UserRecord, UpstreamError> {
        let url = format!("{}/{}", self.users_url(), user_id);
        let params = [("briefRepresentation".to_string(), "true".to_string())];
        self.get_json(&url, token, &params).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        token: &str,
        params: &[(String, String)],
    ) -> Result<T, UpstreamError> {
        tracing::debug!("Requesting {} with {} params", url, params.len());

        let response = self
            .http_client
            .get(url)
            .bearer_auth(token)
            .query(params)
            .send()
            .await
            .map_err(|e| UpstreamError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| UpstreamError::InvalidResponse(e.to_string()))
    }
}
