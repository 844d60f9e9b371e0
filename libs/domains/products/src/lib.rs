//! Products Domain
//!
//! Catalog CRUD. Reads and mutations are exposed as separate routers
//! ([`handlers::read_router`], [`handlers::admin_router`]); the
//! application decides which guards sit in front of each.
//!
//! The in-memory repository also exposes
//! [`InMemoryProductRepository::with_products_mut`] so the orders domain can
//! reserve stock for several products under one lock.

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{ProductError, ProductResult};
pub use models::{Product, ProductInput};
pub use postgres::PgProductRepository;
pub use repository::{InMemoryProductRepository, ProductRepository, ProductTable};
pub use service::ProductService;
