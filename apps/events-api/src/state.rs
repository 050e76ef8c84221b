//! Shared application state.

use axum_helpers::JwtAuth;
use mongodb::{Client, Database};

/// Cloned into each router; every field is a cheap handle.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    /// MongoDB client (shares the underlying connection pool)
    pub mongo_client: Client,
    pub db: Database,
    /// Verifies access tokens on incoming requests
    pub jwt: JwtAuth,
}
