use axum::Router;
use domain_orders::{OrderRepository, OrderService, handlers};

use super::Gate;

/// Own orders for any signed-in user; status updates for admins only.
pub fn router<R: OrderRepository + 'static>(service: OrderService<R>, gate: &Gate) -> Router {
    gate.authenticated(handlers::router(service.clone()))
        .merge(gate.admin(handlers::admin_router(service)))
}
