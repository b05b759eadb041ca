//! Dashboard login check.
//!
//! This is a hardcoded-credential gate for the admin UI, not real
//! authentication: the accepted email and password come from
//! configuration and no session or token is issued.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use crate::routes::MessageBody;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
struct LoginUser {
    id: u32,
    email: String,
}

#[derive(Debug, Serialize)]
struct LoginResponse {
    message: String,
    user: LoginUser,
}

/// POST /api/login - Hardcoded-credential login check
async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, (StatusCode, Json<MessageBody>)> {
    let email = request.email.as_deref().filter(|e| !e.is_empty());
    let password = request.password.as_deref().filter(|p| !p.is_empty());

    let (Some(email), Some(password)) = (email, password) else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(MessageBody {
                message: "Email and password are required.".to_string(),
            }),
        ));
    };

    if email != state.config.login.email || password != state.config.login.password {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(MessageBody {
                message: "Invalid email or password.".to_string(),
            }),
        ));
    }

    Ok(Json(LoginResponse {
        message: "Login successful.".to_string(),
        user: LoginUser {
            id: 1,
            email: email.to_string(),
        },
    }))
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/login", post(login))
        .with_state(state)
}
