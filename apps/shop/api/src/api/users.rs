use axum::Router;
use domain_users::{UserRepository, UserService, handlers};

/// Registration and login are open to anonymous callers.
pub fn router<R: UserRepository + 'static>(service: UserService<R>) -> Router {
    handlers::router(service)
}
