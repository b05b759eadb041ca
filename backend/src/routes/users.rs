//! User relay routes.
//!
//! Provides:
//! - Paginated/filtered user list (`/api/users`)
//! - Full user set passthrough (`/api/allusers`)
//! - CSV export of the (optionally filtered) set (`/api/users/export`)
//! - Single user by id through the read-through cache
//!   (`/api/users/:user_id`)

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::grid::{self, PageItem, UserFilter};
use crate::keycloak::{UpstreamError, UserQuery};
use crate::models::user::UserRecord;
use crate::routes::{internal_error, ErrorBody};
use crate::AppState;

/// Response envelope for the paginated user list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsersPage {
    pub users: Vec<UserRecord>,
    pub current_page: u32,
    pub total_pages: u32,
    pub total_users: u64,
    /// Precomputed pagination display strip (numbers and `"..."`).
    pub pages: Vec<PageItem>,
}

/// Query parameters accepted by GET /api/users.
#[derive(Debug, Default, Deserialize)]
pub struct UsersListParams {
    page: Option<u32>,
    limit: Option<u32>,
    search: Option<String>,
    #[serde(rename = "emailVerified")]
    email_verified: Option<String>,
    enabled: Option<String>,
    utm_source: Option<String>,
    utm_medium: Option<String>,
    utm_campaign: Option<String>,
    utm_term: Option<String>,
    utm_content: Option<String>,
    country: Option<String>,
    how: Option<String>,
    storage: Option<String>,
}

impl UsersListParams {
    /// Translate to the upstream query. Attribute filters keep the
    /// provider's camelCase parameter names.
    fn to_query(&self) -> UserQuery {
        let attributes = [
            ("utmSource", &self.utm_source),
            ("utmMedium", &self.utm_medium),
            ("utmCampaign", &self.utm_campaign),
            ("utmTerm", &self.utm_term),
            ("utmContent", &self.utm_content),
            ("country", &self.country),
            ("how", &self.how),
            ("storage", &self.storage),
        ]
        .into_iter()
        .filter_map(|(name, value)| {
            value
                .as_ref()
                .filter(|v| !v.is_empty())
                .map(|v| (name.to_string(), v.clone()))
        })
        .collect();

        UserQuery {
            page: self.page.unwrap_or(1).max(1),
            limit: self.limit.filter(|l| *l > 0).unwrap_or(10),
            search: self.search.clone(),
            email_verified: self.email_verified.as_deref().map(|v| v == "true"),
            enabled: self.enabled.as_deref().map(|v| v == "true"),
            attributes,
        }
    }
}

/// GET /api/users - Paginated, filtered user list
async fn list_users(
    State(state): State<Arc<AppState>>,
    Query(params): Query<UsersListParams>,
) -> Result<Json<UsersPage>, (StatusCode, Json<ErrorBody>)> {
    let token = state
        .token_provider
        .bearer_token()
        .await
        .map_err(internal_error)?;

    let query = params.to_query();
    let users = state
        .keycloak
        .list_users(&token, &query)
        .await
        .map_err(internal_error)?;
    let total_users = state
        .keycloak
        .count_users(&token, &query)
        .await
        .map_err(internal_error)?;

    let total_pages = grid::total_pages(total_users as usize, query.limit as usize) as u32;

    Ok(Json(UsersPage {
        users,
        current_page: query.page,
        total_pages,
        total_users,
        pages: grid::page_window(query.page, total_pages),
    }))
}

/// GET /api/allusers - Full user set passthrough
async fn all_users(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<UserRecord>>, (StatusCode, Json<ErrorBody>)> {
    let token = state
        .token_provider
        .bearer_token()
        .await
        .map_err(internal_error)?;

    let users = state
        .keycloak
        .fetch_all_users(&token)
        .await
        .map_err(internal_error)?;

    Ok(Json(users))
}

/// Filter parameters accepted by GET /api/users/export. Keys match the
/// attribute names as they appear on the records.
#[derive(Debug, Default, Deserialize)]
pub struct ExportParams {
    search: Option<String>,
    #[serde(rename = "emailVerified")]
    email_verified: Option<String>,
    utm_source: Option<String>,
    utm_medium: Option<String>,
    utm_campaign: Option<String>,
    utm_term: Option<String>,
    utm_content: Option<String>,
    country: Option<String>,
    how: Option<String>,
    storage: Option<String>,
    referral_id: Option<String>,
}

impl ExportParams {
    fn to_filter(&self) -> UserFilter {
        let fields = [
            ("emailVerified", &self.email_verified),
            ("utm_source", &self.utm_source),
            ("utm_medium", &self.utm_medium),
            ("utm_campaign", &self.utm_campaign),
            ("utm_term", &self.utm_term),
            ("utm_content", &self.utm_content),
            ("country", &self.country),
            ("how", &self.how),
            ("storage", &self.storage),
            ("referral_id", &self.referral_id),
        ]
        .into_iter()
        .filter_map(|(name, value)| {
            value
                .as_ref()
                .filter(|v| !v.is_empty())
                .map(|v| (name.to_string(), v.clone()))
        })
        .collect();

        UserFilter {
            fields,
            search: self.search.clone(),
        }
    }
}

/// GET /api/users/export - CSV download of the filtered user set
async fn export_users(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ExportParams>,
) -> Result<Response, (StatusCode, Json<ErrorBody>)> {
    let token = state
        .token_provider
        .bearer_token()
        .await
        .map_err(internal_error)?;

    let users = state
        .keycloak
        .fetch_all_users(&token)
        .await
        .map_err(internal_error)?;

    let filter = params.to_filter();
    let filtered = if filter.is_empty() {
        users
    } else {
        filter.apply(&users)
    };

    tracing::info!("Exporting {} users as CSV", filtered.len());

    let csv = grid::csv::users_to_csv(&filtered);
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"users.csv\"",
            ),
        ],
        csv,
    )
        .into_response())
}

/// GET /api/users/:user_id - Single user through the read-through cache
///
/// A brief metadata fetch supplies the current update timestamp; the
/// cached record is returned only when its timestamp still matches.
async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<UserRecord>, (StatusCode, Json<ErrorBody>)> {
    let token = state
        .token_provider
        .bearer_token()
        .await
        .map_err(internal_error)?;

    let brief = state
        .keycloak
        .fetch_user_brief(&token, &user_id)
        .await
        .map_err(upstream_error)?;

    if let Some(cached) = state.user_cache.get(&user_id).await {
        if cached.updated_timestamp == brief.updated_timestamp {
            tracing::debug!("Serving user {} from cache", user_id);
            return Ok(Json(cached));
        }
    }

    let user = state
        .keycloak
        .fetch_user(&token, &user_id)
        .await
        .map_err(upstream_error)?;
    state.user_cache.insert(user.clone()).await;

    Ok(Json(user))
}

/// Mirror the upstream status for single-user fetches (a missing id
/// should surface as 404, not 500); anything else stays a generic 500.
fn upstream_error(err: UpstreamError) -> (StatusCode, Json<ErrorBody>) {
    tracing::error!("Error fetching user: {}", err);
    let status = err
        .status_code()
        .and_then(|s| StatusCode::from_u16(s).ok())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ErrorBody::internal()))
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/users", get(list_users))
        .route("/api/allusers", get(all_users))
        .route("/api/users/export", get(export_users))
        .route("/api/users/:user_id", get(get_user))
        .with_state(state)
}
