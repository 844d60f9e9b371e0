//! Stateless JWT authentication and role-based authorization.
//!
//! - [`JwtAuth`] issues and verifies HS256 tokens carrying user id and [`Role`]
//! - [`require_auth`] validates the bearer token and attaches an [`AuthUser`]
//! - [`require_admin`] rejects non-admin callers with 403
//!
//! ```ignore
//! use axum::middleware::{from_fn, from_fn_with_state};
//! use axum_helpers::auth::{JwtAuth, JwtConfig, require_admin, require_auth};
//!
//! let auth = JwtAuth::new(&JwtConfig::from_env()?);
//!
//! let admin_routes = Router::new()
//!     .route("/products", post(create_product))
//!     .route_layer(from_fn(require_admin))
//!     .route_layer(from_fn_with_state(auth, require_auth));
//! ```

pub mod config;
pub mod jwt;
pub mod middleware;

pub use config::JwtConfig;
pub use jwt::{IssuedToken, JwtAuth, JwtClaims, JwtError, Role};
pub use middleware::{AuthUser, require_admin, require_auth};
