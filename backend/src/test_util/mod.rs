pub mod mock_keycloak;

use std::time::Duration;

use crate::config::{
    CacheConfig, Config, CorsConfig, KeycloakConfig, LoggingConfig, LoginConfig, ServerConfig,
};
use crate::models::user::UserRecord;
use crate::{AppState, KeycloakClient, TokenProvider, UserCache};

/// Configuration pointing every upstream URL at `keycloak_url`.
pub fn test_config(keycloak_url: &str) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3008,
        },
        keycloak: KeycloakConfig {
            base_url: keycloak_url.to_string(),
            realm: "master".to_string(),
            users_realm: "test-realm".to_string(),
            client_id: "admin-cli".to_string(),
            username: "admin".to_string(),
            password: "admin-secret".to_string(),
        },
        login: LoginConfig {
            email: "dash@example.com".to_string(),
            password: "dash-secret".to_string(),
        },
        cache: CacheConfig { ttl_secs: 60 },
        logging: LoggingConfig {
            level: "debug".to_string(),
        },
        cors: CorsConfig {
            origins: "*".to_string(),
        },
    }
}

/// Application state wired against `keycloak_url`.
pub fn test_state(keycloak_url: &str) -> AppState {
    let config = test_config(keycloak_url);
    let token_provider = TokenProvider::new(&config.keycloak);
    let keycloak = KeycloakClient::new(&config.keycloak);
    let user_cache = UserCache::new(Duration::from_secs(config.cache.ttl_secs));

    AppState {
        config,
        token_provider,
        keycloak,
        user_cache,
    }
}

/// Build a user record from raw JSON, panicking on malformed input.
pub fn user_from_json(value: serde_json::Value) -> UserRecord {
    serde_json::from_value(value).expect("invalid user fixture")
}
