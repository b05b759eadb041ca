//! Configuration for the relay service.

use config::{Config as ConfigLoader, ConfigError, Environment, File};
use serde::Deserialize;

/// Main configuration structure for the relay.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    /// Identity-provider connection and admin credentials.
    pub keycloak: KeycloakConfig,
    /// Dashboard login credentials checked by POST /api/login.
    pub login: LoginConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Keycloak connection settings.
#[derive(Debug, Clone, Deserialize)]
pub struct KeycloakConfig {
    /// Base URL of the Keycloak server, e.g. https://auth.example.com
    pub base_url: String,
    /// Realm the admin token is obtained from.
    pub realm: String,
    /// Realm whose users are relayed to the dashboard.
    pub users_realm: String,
    /// Client id for the password grant.
    pub client_id: String,
    /// Admin account credentials for the password grant.
    pub username: String,
    pub password: String,
}

/// Hardcoded dashboard login credentials.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginConfig {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Time-to-live for cached user records, in seconds.
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_cache_ttl(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    /// Allowed origins, comma-separated, or "*".
    #[serde(default = "default_cors_origins")]
    pub origins: String,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            origins: default_cors_origins(),
        }
    }
}

// Default values
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    3008
}
fn default_cache_ttl() -> u64 {
    60
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_cors_origins() -> String {
    "*".to_string()
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// Configuration sources (in order of precedence):
    /// 1. Environment variables (REALMBOARD__SECTION__KEY format)
    /// 2. config.toml file (if present)
    /// 3. Built-in defaults
    pub fn load() -> Result<Self, ConfigError> {
        let config = ConfigLoader::builder()
            // Set defaults
            .set_default("server.host", default_host())?
            .set_default("server.port", default_port() as i64)?
            .set_default("cache.ttl_secs", default_cache_ttl() as i64)?
            .set_default("logging.level", default_log_level())?
            .set_default("cors.origins", default_cors_origins())?
            // Load from config.toml if exists
            .add_source(File::with_name("config").required(false))
            // Override with environment variables (REALMBOARD__SECTION__KEY format)
            .add_source(
                Environment::with_prefix("REALMBOARD")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
