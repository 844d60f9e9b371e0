use axum::{
    Router,
    middleware::{from_fn, from_fn_with_state},
};
use axum_helpers::{JwtAuth, require_admin, require_auth};
use domain_orders::{OrderRepository, OrderService, PgOrderRepository};
use domain_products::{PgProductRepository, ProductRepository, ProductService};
use domain_users::{PgUserRepository, UserRepository, UserService};

use crate::config::CatalogReadAccess;
use crate::state::AppState;

pub mod health;
pub mod orders;
pub mod products;
pub mod users;

/// Wraps routers in the authentication gates.
///
/// Layers added with `route_layer` only run for matched routes, so an
/// unknown path still falls through to the JSON 404.
#[derive(Clone, Debug)]
pub struct Gate {
    jwt: JwtAuth,
    catalog_read_access: CatalogReadAccess,
}

impl Gate {
    pub fn new(jwt: JwtAuth, catalog_read_access: CatalogReadAccess) -> Self {
        Self {
            jwt,
            catalog_read_access,
        }
    }

    /// Any valid bearer token.
    pub fn authenticated(&self, router: Router) -> Router {
        router.route_layer(from_fn_with_state(self.jwt.clone(), require_auth))
    }

    /// Valid bearer token with the `admin` role. `require_auth` is the outer
    /// layer so an anonymous caller gets 401 before the role check.
    pub fn admin(&self, router: Router) -> Router {
        self.authenticated(router.route_layer(from_fn(require_admin)))
    }

    /// Catalog reads, gated per `CATALOG_READ_ACCESS`.
    pub fn catalog_read(&self, router: Router) -> Router {
        match self.catalog_read_access {
            CatalogReadAccess::Admin => self.admin(router),
            CatalogReadAccess::Authenticated => self.authenticated(router),
            CatalogReadAccess::Public => router,
        }
    }
}

/// Domain services the API is built from.
pub struct Services<U, P, O>
where
    U: UserRepository,
    P: ProductRepository,
    O: OrderRepository,
{
    pub users: UserService<U>,
    pub products: ProductService<P>,
    pub orders: OrderService<O>,
}

/// Composes every domain router behind its gate.
///
/// Generic over the repositories so tests can run the full surface on the
/// in-memory implementations.
pub fn compose<U, P, O>(services: Services<U, P, O>, gate: &Gate) -> Router
where
    U: UserRepository + 'static,
    P: ProductRepository + 'static,
    O: OrderRepository + 'static,
{
    Router::new()
        .merge(users::router(services.users))
        .merge(products::router(services.products, gate))
        .merge(orders::router(services.orders, gate))
}

/// API routes backed by PostgreSQL repositories.
///
/// Returns a stateless Router; docs and middleware are added by
/// `create_router`.
pub fn routes(state: &AppState) -> Router {
    let services = Services {
        users: UserService::new(PgUserRepository::new(state.db.clone()), state.jwt.clone()),
        products: ProductService::new(PgProductRepository::new(state.db.clone())),
        orders: OrderService::new(PgOrderRepository::new(state.db.clone())),
    };
    let gate = Gate::new(state.jwt.clone(), state.config.catalog_read_access);

    compose(services, &gate)
}

/// `GET /ready`, checking the database connection.
pub fn ready_router(state: AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}
