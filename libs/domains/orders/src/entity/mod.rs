//! Sea-ORM entities for `orders` and `order_products`.

pub mod order;
pub mod order_product;
