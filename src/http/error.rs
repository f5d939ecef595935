//! Error responses for the catalog routes

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use tracing::{error, warn};

use crate::catalog::ValidationError;
use crate::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Map a store error; faults are logged and reported with `context` only
    pub fn store(err: StoreError, context: &'static str) -> Self {
        match err {
            StoreError::NotFound { kind, id } => {
                warn!(kind, id = %id, "Record not found");
                AppError::NotFound(format!("{} not found", kind))
            }
            err => {
                error!(error = %err, "{}", context);
                AppError::Internal(context.to_string())
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(ValidationError::MalformedBody(rejection.body_text()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match &self {
            AppError::Validation(err) => {
                warn!(error = %err, "Rejected request body");
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = serde_json::json!({
            "error": message
        });

        (status, Json(body)).into_response()
    }
}
