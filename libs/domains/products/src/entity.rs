use rust_decimal::Decimal;
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;

use crate::models::{Product, ProductInput};

/// Sea-ORM Entity for the products table
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub price: Decimal,
    pub stock: i32,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Product {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            price: model.price,
            stock: model.stock,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

impl From<ProductInput> for ActiveModel {
    fn from(input: ProductInput) -> Self {
        let now = chrono::Utc::now();
        ActiveModel {
            name: Set(input.name),
            description: Set(input.description),
            price: Set(input.price),
            stock: Set(input.stock),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        }
    }
}

impl ActiveModel {
    /// Active model that overwrites every mutable column of row `id`
    pub fn replace(id: i64, input: ProductInput) -> Self {
        ActiveModel {
            id: Set(id),
            name: Set(input.name),
            description: Set(input.description),
            price: Set(input.price),
            stock: Set(input.stock),
            updated_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        }
    }

    /// Active model that only changes the stock of row `id`
    pub fn restock(id: i64, stock: i32) -> Self {
        ActiveModel {
            id: Set(id),
            stock: Set(stock),
            updated_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        }
    }
}
