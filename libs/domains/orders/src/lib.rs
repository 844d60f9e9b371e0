//! Orders Domain
//!
//! Order placement with stock reservation, per-user listing, ownership
//! checks and status transitions:
//!
//! ```text
//! Pending ──cancel (owner/admin)──▶ Cancelled
//!    │
//!    └──status update (admin)────▶ Completed | Cancelled
//! ```
//!
//! Placement is atomic in both repositories: [`PgOrderRepository`] locks
//! the product rows inside one transaction, [`InMemoryOrderRepository`]
//! holds the order store and catalog locks together. Both delegate the
//! stock arithmetic to [`models::OrderDraft::reserve`].

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{OrderError, OrderResult};
pub use models::{
    MAX_ORDER_TOTAL, Order, OrderItem, OrderLine, OrderStatus, PlaceOrder, UpdateOrderStatus,
};
pub use postgres::PgOrderRepository;
pub use repository::{InMemoryOrderRepository, OrderRepository};
pub use service::OrderService;
