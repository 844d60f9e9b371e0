//! Order Service - placement, listing and status changes

use axum_helpers::AuthUser;
use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use crate::error::{OrderError, OrderResult};
use crate::models::{Order, OrderStatus, PlaceOrder};
use crate::repository::OrderRepository;

pub struct OrderService<R: OrderRepository> {
    repository: Arc<R>,
}

impl<R: OrderRepository> OrderService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Place an order owned by `caller`
    #[instrument(skip(self, input), fields(user_id = caller.id, lines = input.products.len()))]
    pub async fn place_order(&self, caller: AuthUser, input: PlaceOrder) -> OrderResult<Order> {
        input.validate()?;
        self.repository.place_order(caller.id, input.products).await
    }

    /// Orders owned by `caller`
    #[instrument(skip(self), fields(user_id = caller.id))]
    pub async fn list_orders(&self, caller: AuthUser) -> OrderResult<Vec<Order>> {
        self.repository.list_by_user(caller.id).await
    }

    /// Non-admins only see their own orders; anything else is reported as
    /// not found.
    #[instrument(skip(self), fields(user_id = caller.id))]
    pub async fn get_order(&self, caller: AuthUser, id: i64) -> OrderResult<Order> {
        self.repository
            .get_by_id(id)
            .await?
            .filter(|order| caller.is_admin() || order.user_id == caller.id)
            .ok_or(OrderError::NotFound(id))
    }

    /// Cancel a pending order. Owners and admins only.
    #[instrument(skip(self), fields(user_id = caller.id))]
    pub async fn cancel_order(&self, caller: AuthUser, id: i64) -> OrderResult<Order> {
        let order = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or(OrderError::NotFound(id))?;

        if !caller.is_admin() && order.user_id != caller.id {
            return Err(OrderError::NotOwner(id));
        }
        if order.status != OrderStatus::Pending {
            return Err(OrderError::NotPending);
        }

        self.repository.cancel_if_pending(id).await
    }

    /// Admin status override; only `Completed` and `Cancelled` are accepted.
    /// A missing order is reported before an unknown status.
    #[instrument(skip(self))]
    pub async fn update_status(&self, id: i64, status: &str) -> OrderResult<Order> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(OrderError::NotFound(id))?;
        let status = OrderStatus::parse_target(status)?;
        self.repository.update_status(id, status).await
    }
}

impl<R: OrderRepository> Clone for OrderService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}
