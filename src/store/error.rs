//! Store errors

/// Errors raised by the item and product stores
///
/// Everything except [`StoreError::NotFound`] is a store fault: the backing
/// store is unreachable or rejected the operation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Datafile I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize document: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Datafile is corrupt: {corrupt} of {total} lines unreadable")]
    Corrupt { corrupt: usize, total: usize },
}

impl StoreError {
    pub fn not_found(kind: &'static str, id: impl ToString) -> Self {
        StoreError::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
