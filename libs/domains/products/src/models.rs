use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// 9999999999.99, the largest value a `NUMERIC(12,2)` column holds
pub const MAX_PRICE: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, 2);

/// Catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Mechanical keyboard")]
    pub name: String,
    pub description: String,
    /// Unit price, two decimal places
    #[schema(value_type = f64, example = 89.99)]
    pub price: Decimal,
    /// Units available; never negative
    #[schema(example = 25)]
    pub stock: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of create and (full) update requests
#[derive(Debug, Clone, PartialEq, Deserialize, Validate, ToSchema)]
pub struct ProductInput {
    /// Surrounding whitespace is ignored
    #[validate(custom(function = "validate_name"))]
    #[schema(example = "Mechanical keyboard", min_length = 1, max_length = 255)]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 2000, message = "Description cannot exceed 2000 characters"))]
    pub description: String,
    #[validate(custom(function = "validate_price"))]
    #[schema(value_type = f64, example = 89.99)]
    pub price: Decimal,
    #[validate(range(min = 0, message = "Stock cannot be negative"))]
    #[schema(example = 25)]
    pub stock: i32,
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    let len = name.trim().chars().count();
    if !(1..=255).contains(&len) {
        return Err(ValidationError::new("length")
            .with_message("Name must be between 1 and 255 characters".into()));
    }
    Ok(())
}

fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(ValidationError::new("range").with_message("Price cannot be negative".into()));
    }
    if price.round_dp(2) > MAX_PRICE {
        return Err(ValidationError::new("range").with_message("Price is too large".into()));
    }
    Ok(())
}

impl ProductInput {
    /// Trimmed name, price rounded to cents
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            description: self.description,
            price: self.price.round_dp(2),
            stock: self.stock,
        }
    }
}
