//! Application state shared by the route builders and the readiness probe.

use axum_helpers::JwtAuth;
use database::postgres::DatabaseConnection;

/// Cloned into each router builder; every field is a cheap handle.
#[derive(Clone)]
pub struct AppState {
    /// Configuration loaded from environment variables
    pub config: crate::config::Config,
    /// PostgreSQL connection pool
    pub db: DatabaseConnection,
    /// Token issuer/verifier built from `config.jwt`
    pub jwt: JwtAuth,
}

impl AppState {
    pub fn new(config: crate::config::Config, db: DatabaseConnection) -> Self {
        let jwt = JwtAuth::new(&config.jwt);
        Self { config, db, jwt }
    }
}
