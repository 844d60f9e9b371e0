use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use domain_products::ProductError;
use sea_orm::DbErr;
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Order not found: {0}")]
    NotFound(i64),

    #[error("Product not found: {0}")]
    ProductNotFound(i64),

    #[error("Insufficient stock for product {0}")]
    InsufficientStock(i64),

    #[error("Order must contain at least one product")]
    EmptyOrder,

    #[error("Quantity must be at least 1 for product {0}")]
    InvalidQuantity(i64),

    #[error("Order total exceeds the maximum allowed amount")]
    TotalTooLarge,

    #[error("User does not own order {0}")]
    NotOwner(i64),

    #[error("Only pending orders can be cancelled")]
    NotPending,

    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Stored order is inconsistent: {0}")]
    Corrupt(String),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

pub type OrderResult<T> = Result<T, OrderError>;

impl From<ProductError> for OrderError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::NotFound(id) => OrderError::ProductNotFound(id),
            ProductError::Validation(errors) => OrderError::Validation(errors),
            ProductError::Database(e) => OrderError::Database(e),
        }
    }
}

/// Convert OrderError to AppError for standardized error responses
impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::NotFound(_) => AppError::NotFound("Order not found".to_string()),
            OrderError::ProductNotFound(id) => {
                AppError::NotFound(format!("Product not found: {}", id))
            }
            e @ (OrderError::InsufficientStock(_)
            | OrderError::EmptyOrder
            | OrderError::InvalidQuantity(_)
            | OrderError::TotalTooLarge
            | OrderError::NotPending) => AppError::BadRequest(e.to_string()),
            OrderError::NotOwner(_) => AppError::Forbidden("You do not own this order".to_string()),
            OrderError::InvalidStatus(_) => AppError::BadRequest("Invalid status".to_string()),
            OrderError::Validation(errors) => AppError::ValidationError(errors),
            OrderError::Corrupt(msg) => AppError::InternalServerError(msg),
            OrderError::Database(e) => AppError::Database(e),
        }
    }
}

impl IntoResponse for OrderError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_error_statuses_and_messages() {
        let cases = [
            (OrderError::NotFound(1), StatusCode::NOT_FOUND, "Order not found"),
            (
                OrderError::ProductNotFound(4),
                StatusCode::NOT_FOUND,
                "Product not found: 4",
            ),
            (
                OrderError::InsufficientStock(4),
                StatusCode::BAD_REQUEST,
                "Insufficient stock for product 4",
            ),
            (
                OrderError::TotalTooLarge,
                StatusCode::BAD_REQUEST,
                "Order total exceeds the maximum allowed amount",
            ),
            (
                OrderError::NotOwner(1),
                StatusCode::FORBIDDEN,
                "You do not own this order",
            ),
            (
                OrderError::NotPending,
                StatusCode::BAD_REQUEST,
                "Only pending orders can be cancelled",
            ),
            (
                OrderError::InvalidStatus("Shipped".into()),
                StatusCode::BAD_REQUEST,
                "Invalid status",
            ),
        ];

        for (err, status, message) in cases {
            let app: AppError = err.into();
            assert_eq!(app.status(), status);
            assert!(app.to_string().ends_with(message), "{app}");
        }
    }
}
