//! Shop HTTP API
//!
//! ## Architecture
//!
//! ```text
//! Client
//!   ↓ (HTTP/JSON, Bearer token)
//! Gate (require_auth / require_admin per route group)
//!   ↓
//! Domain handlers (users, products, orders)
//!   ↓
//! Services → Pg*Repository
//!   ↓
//! PostgreSQL
//! ```
//!
//! ## Modules
//!
//! - `config`: environment configuration, including `CATALOG_READ_ACCESS`
//! - `state`: shared handles (config, pool, JWT)
//! - `api`: route composition and gates
//! - `openapi`: merged OpenAPI document

pub mod api;
pub mod config;
pub mod openapi;
pub mod state;

pub use config::{CatalogReadAccess, Config};
pub use state::AppState;
