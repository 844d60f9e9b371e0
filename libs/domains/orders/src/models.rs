use chrono::{DateTime, Utc};
use domain_products::Product;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use strum::{Display, EnumString};
use utoipa::ToSchema;
use validator::Validate;

use crate::error::{OrderError, OrderResult};

/// 999999999999999999.99, the largest value the `NUMERIC(20,2)` total column holds
pub const MAX_ORDER_TOTAL: Decimal =
    Decimal::from_parts(1_661_992_959, 1_808_227_885, 5, false, 2);

/// Order lifecycle: `Pending` until completed by an admin or cancelled.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
pub enum OrderStatus {
    #[default]
    Pending,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Statuses an admin may set explicitly
    pub fn parse_target(value: &str) -> OrderResult<Self> {
        match value.parse::<OrderStatus>() {
            Ok(status @ (OrderStatus::Completed | OrderStatus::Cancelled)) => Ok(status),
            _ => Err(OrderError::InvalidStatus(value.to_string())),
        }
    }
}

/// Line item of an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    #[schema(example = 2)]
    pub quantity: i32,
    /// Product price when the order was placed
    #[schema(value_type = f64, example = 10.0)]
    pub unit_price: Decimal,
    /// Current catalog entry; `null` once the product has been deleted
    pub product: Option<Product>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    pub status: OrderStatus,
    /// Σ quantity × unit_price over the line items
    #[schema(value_type = f64, example = 25.0)]
    pub total_amount: Decimal,
    pub products: Vec<OrderItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One requested line of a new order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct OrderLine {
    #[validate(range(min = 1, message = "Invalid product id"))]
    #[schema(example = 1)]
    pub product_id: i64,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    #[schema(example = 2)]
    pub quantity: i32,
}

/// `POST /orders` body
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct PlaceOrder {
    #[validate(length(min = 1, message = "Order must contain at least one product"), nested)]
    pub products: Vec<OrderLine>,
}

/// `PUT /orders/{id}/status` body
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateOrderStatus {
    /// `Completed` or `Cancelled`
    #[validate(length(min = 1, message = "Status is required"))]
    #[schema(example = "Completed")]
    pub status: String,
}

/// A line whose stock has been reserved
#[derive(Debug, Clone, PartialEq)]
pub struct DraftLine {
    pub product_id: i64,
    pub quantity: i32,
    pub unit_price: Decimal,
}

/// Result of reserving stock for every line of an order, before it is stored.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDraft {
    pub lines: Vec<DraftLine>,
    pub total: Decimal,
}

impl OrderDraft {
    /// Reserve stock for `lines`, in order, against `products`.
    ///
    /// `products` is a working copy: on success it holds the decremented
    /// stock of every product touched; on error its contents are
    /// unspecified and must be discarded. A product repeated across lines
    /// sees the stock left by the earlier lines.
    pub fn reserve(lines: &[OrderLine], products: &mut HashMap<i64, Product>) -> OrderResult<Self> {
        if lines.is_empty() {
            return Err(OrderError::EmptyOrder);
        }

        let mut draft = OrderDraft {
            lines: Vec::with_capacity(lines.len()),
            total: Decimal::ZERO,
        };

        for line in lines {
            if line.quantity < 1 {
                return Err(OrderError::InvalidQuantity(line.product_id));
            }

            let product = products
                .get_mut(&line.product_id)
                .ok_or(OrderError::ProductNotFound(line.product_id))?;

            if line.quantity > product.stock {
                return Err(OrderError::InsufficientStock(line.product_id));
            }

            draft.total = product
                .price
                .checked_mul(Decimal::from(line.quantity))
                .and_then(|subtotal| draft.total.checked_add(subtotal))
                .filter(|total| *total <= MAX_ORDER_TOTAL)
                .ok_or(OrderError::TotalTooLarge)?;
            product.stock -= line.quantity;
            draft.lines.push(DraftLine {
                product_id: product.id,
                quantity: line.quantity,
                unit_price: product.price,
            });
        }

        Ok(draft)
    }

    /// Distinct product ids, ascending
    pub fn product_ids(&self) -> Vec<i64> {
        let mut ids: Vec<i64> = self.lines.iter().map(|l| l.product_id).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: i64, cents: i64, stock: i32) -> Product {
        Product {
            id,
            name: format!("product-{id}"),
            description: String::new(),
            price: Decimal::new(cents, 2),
            stock,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn catalog(products: Vec<Product>) -> HashMap<i64, Product> {
        products.into_iter().map(|p| (p.id, p)).collect()
    }

    fn line(product_id: i64, quantity: i32) -> OrderLine {
        OrderLine {
            product_id,
            quantity,
        }
    }

    #[test]
    fn test_reserve_computes_total_and_decrements_stock() {
        let mut products = catalog(vec![product(1, 1000, 5), product(2, 500, 3)]);

        let draft = OrderDraft::reserve(&[line(1, 2), line(2, 1)], &mut products).unwrap();

        assert_eq!(draft.total, Decimal::new(2500, 2));
        assert_eq!(products[&1].stock, 3);
        assert_eq!(products[&2].stock, 2);
        assert_eq!(draft.lines[0].unit_price, Decimal::new(1000, 2));
        assert_eq!(draft.product_ids(), vec![1, 2]);
    }

    #[test]
    fn test_reserve_repeated_product_sees_earlier_lines() {
        let mut products = catalog(vec![product(1, 100, 3)]);

        let err = OrderDraft::reserve(&[line(1, 2), line(1, 2)], &mut products).unwrap_err();
        assert!(matches!(err, OrderError::InsufficientStock(1)));

        let mut products = catalog(vec![product(1, 100, 4)]);
        let draft = OrderDraft::reserve(&[line(1, 2), line(1, 2)], &mut products).unwrap();
        assert_eq!(products[&1].stock, 0);
        assert_eq!(draft.lines.len(), 2);
        assert_eq!(draft.product_ids(), vec![1]);
    }

    #[test]
    fn test_reserve_reports_first_failing_line() {
        let mut products = catalog(vec![product(1, 100, 1)]);

        let err = OrderDraft::reserve(&[line(9, 1), line(1, 5)], &mut products).unwrap_err();
        assert!(matches!(err, OrderError::ProductNotFound(9)));

        let err = OrderDraft::reserve(&[line(1, 5), line(9, 1)], &mut products).unwrap_err();
        assert!(matches!(err, OrderError::InsufficientStock(1)));
    }

    #[test]
    fn test_reserve_rejects_empty_and_non_positive() {
        let mut products = catalog(vec![product(1, 100, 1)]);
        assert!(matches!(
            OrderDraft::reserve(&[], &mut products),
            Err(OrderError::EmptyOrder)
        ));
        assert!(matches!(
            OrderDraft::reserve(&[line(1, 0)], &mut products),
            Err(OrderError::InvalidQuantity(1))
        ));
    }

    #[test]
    fn test_reserve_total_may_exceed_unit_price_bound() {
        let mut products = catalog(vec![product(1, 600_000_000_000, 2)]);

        let draft = OrderDraft::reserve(&[line(1, 2)], &mut products).unwrap();

        assert_eq!(draft.total, Decimal::new(1_200_000_000_000, 2));
        assert_eq!(products[&1].stock, 0);
    }

    #[test]
    fn test_reserve_caps_total_at_column_maximum() {
        assert_eq!(MAX_ORDER_TOTAL.to_string(), "999999999999999999.99");

        // 9999999999.99 x 100000000 = 999999999999000000.00
        let mut products = catalog(vec![product(1, 999_999_999_999, i32::MAX)]);
        let draft = OrderDraft::reserve(&[line(1, 100_000_000)], &mut products).unwrap();
        assert!(draft.total <= MAX_ORDER_TOTAL);

        let mut products = catalog(vec![product(1, 999_999_999_999, i32::MAX)]);
        let err = OrderDraft::reserve(&[line(1, 100_000_001)], &mut products).unwrap_err();
        assert!(matches!(err, OrderError::TotalTooLarge));

        let mut products = catalog(vec![product(1, 999_999_999_999, i32::MAX)]);
        let err = OrderDraft::reserve(&[line(1, i32::MAX)], &mut products).unwrap_err();
        assert!(matches!(err, OrderError::TotalTooLarge));
    }

    #[test]
    fn test_status_wire_format_is_capitalised() {
        assert_eq!(serde_json::to_value(OrderStatus::Pending).unwrap(), "Pending");
        assert_eq!(OrderStatus::Cancelled.to_string(), "Cancelled");
        assert_eq!("Completed".parse::<OrderStatus>().unwrap(), OrderStatus::Completed);
    }

    #[test]
    fn test_parse_target_only_allows_terminal_states() {
        assert_eq!(OrderStatus::parse_target("Completed").unwrap(), OrderStatus::Completed);
        assert_eq!(OrderStatus::parse_target("Cancelled").unwrap(), OrderStatus::Cancelled);
        for bad in ["Pending", "completed", "Shipped", ""] {
            assert!(matches!(
                OrderStatus::parse_target(bad),
                Err(OrderError::InvalidStatus(_))
            ));
        }
    }

    #[test]
    fn test_place_order_validation() {
        let empty = PlaceOrder { products: vec![] };
        assert!(empty.validate().is_err());

        let zero = PlaceOrder {
            products: vec![line(1, 0)],
        };
        assert!(zero.validate().is_err());

        let ok = PlaceOrder {
            products: vec![line(1, 1)],
        };
        assert!(ok.validate().is_ok());
    }
}
