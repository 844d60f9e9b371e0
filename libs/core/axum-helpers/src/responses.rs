//! Success bodies shared by several domains.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// `{"message": "..."}` returned by operations that have no resource to echo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Order cancelled successfully")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
