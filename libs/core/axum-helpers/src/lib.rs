//! # Axum Helpers
//!
//! Shared building blocks for the shop HTTP services.
//!
//! - **[`auth`]**: stateless JWT issuing/verification, `require_auth` / `require_admin` gates
//! - **[`server`]**: router assembly with OpenAPI docs, health checks, graceful shutdown
//! - **[`http`]**: CORS and security headers
//! - **[`errors`]**: `AppError` and the JSON error body
//! - **[`extractors`]**: `IdPath`, `ValidatedJson`
//! - **[`responses`]**: `MessageResponse`

pub mod auth;
pub mod errors;
pub mod extractors;
pub mod http;
pub mod responses;
pub mod server;

pub use auth::{
    AuthUser, IssuedToken, JwtAuth, JwtClaims, JwtConfig, JwtError, Role, require_admin,
    require_auth,
};

pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, create_production_app, create_router,
    health_router, run_health_checks, shutdown_signal,
};

pub use http::{CorsConfig, create_cors_layer, security_headers};

pub use errors::{AppError, ErrorCode, ErrorResponse};

pub use extractors::{IdPath, ValidatedJson};

pub use responses::MessageResponse;
