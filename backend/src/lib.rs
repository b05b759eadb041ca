pub mod auth;
pub mod cache;
pub mod config;
pub mod grid;
pub mod keycloak;
pub mod logging;
pub mod models;
pub mod routes;
pub mod test_util;

pub use auth::TokenProvider;
pub use cache::UserCache;
pub use config::Config;
pub use keycloak::{KeycloakClient, UserQuery};
pub use models::summary::DashboardSummary;
pub use models::user::UserRecord;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    /// Cached admin bearer token for the identity provider.
    pub token_provider: TokenProvider,
    /// Read-only client for the provider's user-management API.
    pub keycloak: KeycloakClient,
    /// Per-user record cache with a fixed TTL.
    pub user_cache: UserCache,
}
