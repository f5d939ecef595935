//! HTTP layer: routing, handlers and error responses

pub mod error;
pub mod items;
pub mod products;
pub mod routes;

use serde::{Deserialize, Serialize};

pub use error::AppError;
pub use routes::build_router;

/// Body returned by both delete endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub message: String,
}

impl Default for DeleteResponse {
    fn default() -> Self {
        Self {
            message: "Item deleted successfully".to_string(),
        }
    }
}
