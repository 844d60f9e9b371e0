use async_trait::async_trait;
use chrono::Utc;
use domain_products::{Product, entity as product_entity};
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Select, TransactionTrait,
};
use std::collections::HashMap;

use crate::{
    entity::{order, order_product},
    error::{OrderError, OrderResult},
    models::{Order, OrderDraft, OrderItem, OrderLine, OrderStatus},
    repository::{OrderRepository, attach_products, referenced_products},
};

/// PostgreSQL-backed order repository
#[derive(Clone)]
pub struct PgOrderRepository {
    db: DatabaseConnection,
}

impl PgOrderRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Run `query` with line items and products attached.
    async fn load(&self, query: Select<order::Entity>) -> OrderResult<Vec<Order>> {
        let rows = query
            .find_with_related(order_product::Entity)
            .order_by_asc(order::Column::Id)
            .order_by_asc(order_product::Column::Id)
            .all(&self.db)
            .await?;

        let mut orders = rows
            .into_iter()
            .map(|(order, items)| to_order(order, items))
            .collect::<OrderResult<Vec<_>>>()?;

        let ids = referenced_products(&orders);
        if !ids.is_empty() {
            let products = product_entity::Entity::find()
                .filter(product_entity::Column::Id.is_in(ids))
                .all(&self.db)
                .await?
                .into_iter()
                .map(Product::from)
                .collect();
            attach_products(&mut orders, products);
        }

        Ok(orders)
    }

    async fn load_one(&self, id: i64) -> OrderResult<Order> {
        self.load(order::Entity::find_by_id(id))
            .await?
            .pop()
            .ok_or(OrderError::NotFound(id))
    }
}

fn parse_status(model: &order::Model) -> OrderResult<OrderStatus> {
    model.status.parse().map_err(|_| {
        OrderError::Corrupt(format!(
            "order {} has unknown status '{}'",
            model.id, model.status
        ))
    })
}

fn to_order(model: order::Model, items: Vec<order_product::Model>) -> OrderResult<Order> {
    Ok(Order {
        id: model.id,
        user_id: model.user_id,
        status: parse_status(&model)?,
        total_amount: model.total_amount,
        products: items
            .into_iter()
            .map(|item| OrderItem {
                id: item.id,
                order_id: item.order_id,
                product_id: item.product_id,
                quantity: item.quantity,
                unit_price: item.unit_price,
                product: None,
            })
            .collect(),
        created_at: model.created_at.into(),
        updated_at: model.updated_at.into(),
    })
}

/// Lock the rows of every product in `lines` (ascending id, so concurrent
/// placements cannot deadlock) and return them keyed by id.
async fn lock_products<C: ConnectionTrait>(
    conn: &C,
    lines: &[OrderLine],
) -> OrderResult<HashMap<i64, Product>> {
    let mut ids: Vec<i64> = lines.iter().map(|l| l.product_id).collect();
    ids.sort_unstable();
    ids.dedup();

    let rows = product_entity::Entity::find()
        .filter(product_entity::Column::Id.is_in(ids))
        .order_by_asc(product_entity::Column::Id)
        .lock_exclusive()
        .all(conn)
        .await?;

    Ok(rows.into_iter().map(|m| (m.id, Product::from(m))).collect())
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn place_order(&self, user_id: i64, lines: Vec<OrderLine>) -> OrderResult<Order> {
        // Dropping `txn` on any early return rolls everything back.
        let txn = self.db.begin().await?;

        let mut products = lock_products(&txn, &lines).await?;
        let draft = OrderDraft::reserve(&lines, &mut products)?;

        for product_id in draft.product_ids() {
            if let Some(product) = products.get(&product_id) {
                product_entity::ActiveModel::restock(product_id, product.stock)
                    .update(&txn)
                    .await?;
            }
        }

        let now = Utc::now();
        let order = order::ActiveModel {
            user_id: Set(user_id),
            status: Set(OrderStatus::Pending.to_string()),
            total_amount: Set(draft.total),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let items = draft.lines.iter().map(|line| order_product::ActiveModel {
            order_id: Set(order.id),
            product_id: Set(line.product_id),
            quantity: Set(line.quantity),
            unit_price: Set(line.unit_price),
            ..Default::default()
        });
        order_product::Entity::insert_many(items).exec(&txn).await?;

        txn.commit().await?;

        tracing::info!(order_id = order.id, user_id, total = %draft.total, "Placed order");
        self.load_one(order.id).await
    }

    async fn get_by_id(&self, id: i64) -> OrderResult<Option<Order>> {
        Ok(self.load(order::Entity::find_by_id(id)).await?.pop())
    }

    async fn list_by_user(&self, user_id: i64) -> OrderResult<Vec<Order>> {
        self.load(order::Entity::find().filter(order::Column::UserId.eq(user_id)))
            .await
    }

    async fn update_status(&self, id: i64, status: OrderStatus) -> OrderResult<Order> {
        let existing = order::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(OrderError::NotFound(id))?;

        let mut active: order::ActiveModel = existing.into();
        active.status = Set(status.to_string());
        active.updated_at = Set(Utc::now().into());
        active.update(&self.db).await?;

        tracing::info!(order_id = id, status = %status, "Updated order status");
        self.load_one(id).await
    }

    async fn cancel_if_pending(&self, id: i64) -> OrderResult<Order> {
        let txn = self.db.begin().await?;

        let existing = order::Entity::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(OrderError::NotFound(id))?;

        if parse_status(&existing)? != OrderStatus::Pending {
            return Err(OrderError::NotPending);
        }

        let mut active: order::ActiveModel = existing.into();
        active.status = Set(OrderStatus::Cancelled.to_string());
        active.updated_at = Set(Utc::now().into());
        active.update(&txn).await?;
        txn.commit().await?;

        tracing::info!(order_id = id, "Cancelled order");
        self.load_one(id).await
    }
}
