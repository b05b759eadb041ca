use std::sync::Arc;
use std::time::Duration;

use axum::{middleware, Router};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use realmboard_backend::{logging, routes, AppState, Config, KeycloakClient, TokenProvider, UserCache};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::load()?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Realmboard relay");

    // Initialize components
    let token_provider = TokenProvider::new(&config.keycloak);
    let keycloak = KeycloakClient::new(&config.keycloak);
    let user_cache = UserCache::new(Duration::from_secs(config.cache.ttl_secs));

    let state = Arc::new(AppState {
        config: config.clone(),
        token_provider,
        keycloak,
        user_cache,
    });

    // Build CORS layer
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router
    let app = Router::new()
        .merge(routes::health::router())
        .merge(routes::users::router(state.clone()))
        .merge(routes::dashboard::router(state.clone()))
        .merge(routes::login::router(state.clone()))
        .merge(routes::cache::router(state))
        .layer(middleware::from_fn(logging::request_logger))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
