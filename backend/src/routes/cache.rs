//! Cache administration route.

use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};

use crate::routes::MessageBody;
use crate::AppState;

/// POST /api/clear-cache - Drop every cached user record
async fn clear_cache(State(state): State<Arc<AppState>>) -> Json<MessageBody> {
    state.user_cache.flush().await;
    Json(MessageBody {
        message: "Cache cleared successfully".to_string(),
    })
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/clear-cache", post(clear_cache))
        .with_state(state)
}
