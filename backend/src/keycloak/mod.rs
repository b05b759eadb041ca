pub mod client;
pub mod query;

pub use client::{KeycloakClient, UpstreamError};
pub use query::UserQuery;
