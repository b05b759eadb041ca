//! Dashboard summary route.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

use crate::models::summary::DashboardSummary;
use crate::routes::{internal_error, ErrorBody};
use crate::AppState;

/// Wrapper matching the dashboard's expected shape.
#[derive(Debug, Serialize)]
struct DashboardResponse {
    summary: DashboardSummary,
}

/// GET /api/dashboard - Summary statistics over the full user set
///
/// The aggregate is recomputed from scratch on every request; nothing
/// is persisted or maintained incrementally.
async fn dashboard(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DashboardResponse>, (StatusCode, Json<ErrorBody>)> {
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

    Ok(Json(DashboardResponse {
        summary: DashboardSummary::from_users(&users),
    }))
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/dashboard", get(dashboard))
        .with_state(state)
}
