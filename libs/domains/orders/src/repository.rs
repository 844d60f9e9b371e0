use async_trait::async_trait;
use chrono::Utc;
use domain_products::{InMemoryProductRepository, Product, ProductRepository};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{OrderError, OrderResult};
use crate::models::{Order, OrderDraft, OrderItem, OrderLine, OrderStatus};

/// Repository trait for Order persistence
///
/// Returned orders always carry their line items with the referenced
/// products attached.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Reserve stock and store a `Pending` order for `user_id`, atomically.
    ///
    /// Either every line is reserved and the order exists, or nothing
    /// changed.
    async fn place_order(&self, user_id: i64, lines: Vec<OrderLine>) -> OrderResult<Order>;

    /// Get an order by ID
    async fn get_by_id(&self, id: i64) -> OrderResult<Option<Order>>;

    /// Orders owned by `user_id`, ascending id
    async fn list_by_user(&self, user_id: i64) -> OrderResult<Vec<Order>>;

    /// Set the status regardless of the current one
    async fn update_status(&self, id: i64, status: OrderStatus) -> OrderResult<Order>;

    /// `Pending` → `Cancelled`; `OrderError::NotPending` from any other status
    async fn cancel_if_pending(&self, id: i64) -> OrderResult<Order>;
}

/// Fill `item.product` from `products`; unknown ids stay `None`.
pub(crate) fn attach_products(orders: &mut [Order], products: Vec<Product>) {
    let catalog: HashMap<i64, Product> = products.into_iter().map(|p| (p.id, p)).collect();
    for item in orders.iter_mut().flat_map(|o| o.products.iter_mut()) {
        item.product = catalog.get(&item.product_id).cloned();
    }
}

/// Distinct product ids referenced by `orders`
pub(crate) fn referenced_products(orders: &[Order]) -> Vec<i64> {
    let mut ids: Vec<i64> = orders
        .iter()
        .flat_map(|o| o.products.iter().map(|i| i.product_id))
        .collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

#[derive(Debug, Default)]
struct Store {
    next_order_id: i64,
    next_item_id: i64,
    orders: BTreeMap<i64, Order>,
}

/// In-memory implementation of OrderRepository (for development/testing)
///
/// Shares the catalog with an [`InMemoryProductRepository`]. Placement holds
/// the order store lock and the catalog lock together; the order store is
/// always locked first.
#[derive(Debug, Clone)]
pub struct InMemoryOrderRepository {
    products: InMemoryProductRepository,
    store: Arc<RwLock<Store>>,
}

impl InMemoryOrderRepository {
    pub fn new(products: InMemoryProductRepository) -> Self {
        Self {
            products,
            store: Arc::new(RwLock::new(Store::default())),
        }
    }

    async fn with_products(&self, mut orders: Vec<Order>) -> OrderResult<Vec<Order>> {
        let products = self
            .products
            .get_by_ids(referenced_products(&orders))
            .await?;
        attach_products(&mut orders, products);
        Ok(orders)
    }

    async fn with_products_one(&self, order: Order) -> OrderResult<Order> {
        let id = order.id;
        self.with_products(vec![order])
            .await?
            .pop()
            .ok_or(OrderError::NotFound(id))
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn place_order(&self, user_id: i64, lines: Vec<OrderLine>) -> OrderResult<Order> {
        let mut store = self.store.write().await;

        let draft = self
            .products
            .with_products_mut(|table| {
                let mut staged: HashMap<i64, Product> = lines
                    .iter()
                    .filter_map(|line| table.get(&line.product_id))
                    .map(|p| (p.id, p.clone()))
                    .collect();

                let draft = OrderDraft::reserve(&lines, &mut staged)?;

                let now = Utc::now();
                for (id, reserved) in staged {
                    if let Some(product) = table.get_mut(&id) {
                        product.stock = reserved.stock;
                        product.updated_at = now;
                    }
                }
                Ok::<_, OrderError>(draft)
            })
            .await?;

        store.next_order_id += 1;
        let order_id = store.next_order_id;

        let mut items = Vec::with_capacity(draft.lines.len());
        for line in draft.lines {
            store.next_item_id += 1;
            items.push(OrderItem {
                id: store.next_item_id,
                order_id,
                product_id: line.product_id,
                quantity: line.quantity,
                unit_price: line.unit_price,
                product: None,
            });
        }

        let now = Utc::now();
        let order = Order {
            id: order_id,
            user_id,
            status: OrderStatus::Pending,
            total_amount: draft.total,
            products: items,
            created_at: now,
            updated_at: now,
        };
        store.orders.insert(order_id, order.clone());
        drop(store);

        tracing::info!(order_id, user_id, total = %order.total_amount, "Placed order");
        self.with_products_one(order).await
    }

    async fn get_by_id(&self, id: i64) -> OrderResult<Option<Order>> {
        let order = self.store.read().await.orders.get(&id).cloned();
        match order {
            Some(order) => Ok(Some(self.with_products_one(order).await?)),
            None => Ok(None),
        }
    }

    async fn list_by_user(&self, user_id: i64) -> OrderResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .store
            .read()
            .await
            .orders
            .values()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect();
        self.with_products(orders).await
    }

    async fn update_status(&self, id: i64, status: OrderStatus) -> OrderResult<Order> {
        let order = {
            let mut store = self.store.write().await;
            let order = store.orders.get_mut(&id).ok_or(OrderError::NotFound(id))?;
            order.status = status;
            order.updated_at = Utc::now();
            order.clone()
        };

        tracing::info!(order_id = id, status = %status, "Updated order status");
        self.with_products_one(order).await
    }

    async fn cancel_if_pending(&self, id: i64) -> OrderResult<Order> {
        let order = {
            let mut store = self.store.write().await;
            let order = store.orders.get_mut(&id).ok_or(OrderError::NotFound(id))?;
            if order.status != OrderStatus::Pending {
                return Err(OrderError::NotPending);
            }
            order.status = OrderStatus::Cancelled;
            order.updated_at = Utc::now();
            order.clone()
        };

        tracing::info!(order_id = id, "Cancelled order");
        self.with_products_one(order).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_products::ProductInput;
    use rust_decimal::Decimal;

    async fn seeded(stock: &[(i64, i32)]) -> (InMemoryOrderRepository, InMemoryProductRepository) {
        let products = InMemoryProductRepository::new();
        for (cents, qty) in stock {
            products
                .create(ProductInput {
                    name: format!("p{cents}"),
                    description: String::new(),
                    price: Decimal::new(*cents, 2),
                    stock: *qty,
                })
                .await
                .unwrap();
        }
        (InMemoryOrderRepository::new(products.clone()), products)
    }

    fn line(product_id: i64, quantity: i32) -> OrderLine {
        OrderLine {
            product_id,
            quantity,
        }
    }

    #[tokio::test]
    async fn test_place_order_reserves_stock_and_attaches_products() {
        let (orders, products) = seeded(&[(1000, 5), (500, 3)]).await;

        let order = orders
            .place_order(7, vec![line(1, 2), line(2, 1)])
            .await
            .unwrap();

        assert_eq!(order.total_amount, Decimal::new(2500, 2));
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.user_id, 7);
        assert_eq!(order.products.len(), 2);
        assert_eq!(order.products[0].product.as_ref().unwrap().stock, 3);
        assert_eq!(products.get_by_id(1).await.unwrap().unwrap().stock, 3);
        assert_eq!(products.get_by_id(2).await.unwrap().unwrap().stock, 2);
    }

    #[tokio::test]
    async fn test_failed_placement_changes_nothing() {
        let (orders, products) = seeded(&[(1000, 5), (500, 1)]).await;

        let err = orders
            .place_order(7, vec![line(1, 2), line(2, 2)])
            .await
            .unwrap_err();

        assert!(matches!(err, OrderError::InsufficientStock(2)));
        assert_eq!(products.get_by_id(1).await.unwrap().unwrap().stock, 5);
        assert!(orders.list_by_user(7).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_deleted_product_leaves_line_without_product() {
        let (orders, products) = seeded(&[(1000, 5)]).await;
        let order = orders.place_order(1, vec![line(1, 1)]).await.unwrap();

        products.delete(1).await.unwrap();

        let order = orders.get_by_id(order.id).await.unwrap().unwrap();
        assert_eq!(order.products[0].product_id, 1);
        assert!(order.products[0].product.is_none());
        assert_eq!(order.products[0].unit_price, Decimal::new(1000, 2));
    }

    #[tokio::test]
    async fn test_cancel_if_pending() {
        let (orders, _) = seeded(&[(100, 5)]).await;
        let order = orders.place_order(1, vec![line(1, 1)]).await.unwrap();

        let cancelled = orders.cancel_if_pending(order.id).await.unwrap();
        assert_eq!(cancelled.status, OrderStatus::Cancelled);

        assert!(matches!(
            orders.cancel_if_pending(order.id).await,
            Err(OrderError::NotPending)
        ));
        assert!(matches!(
            orders.cancel_if_pending(99).await,
            Err(OrderError::NotFound(99))
        ));
    }

    #[tokio::test]
    async fn test_list_only_returns_owned_orders() {
        let (orders, _) = seeded(&[(100, 10)]).await;
        orders.place_order(1, vec![line(1, 1)]).await.unwrap();
        orders.place_order(2, vec![line(1, 1)]).await.unwrap();
        orders.place_order(1, vec![line(1, 1)]).await.unwrap();

        let ids: Vec<i64> = orders
            .list_by_user(1)
            .await
            .unwrap()
            .iter()
            .map(|o| o.id)
            .collect();
        assert_eq!(ids, vec![1, 3]);
    }
}
