use axum::Router;
use domain_products::{ProductRepository, ProductService, handlers};

use super::Gate;

pub fn router<R: ProductRepository + 'static>(service: ProductService<R>, gate: &Gate) -> Router {
    gate.catalog_read(handlers::read_router(service.clone()))
        .merge(gate.admin(handlers::admin_router(service)))
}
