//! Shared application state.

use axum_helpers::JwtAuth;
use mongodb::{Client, Database};

/// Cloned into every router; all members are cheap handle clones.
#[derive(Clone)]
pub struct AppState {
    /// Configuration loaded from the environment
    pub config: crate::config::Config,
    /// MongoDB client (shares the driver's connection pool)
    pub mongo_client: Client,
    /// The application database
    pub db: Database,
    /// Token issuer/verifier shared by the auth and events routers
    pub jwt: JwtAuth,
}
