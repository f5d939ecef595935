//! Item stores: a relational table and a document collection
//!
//! The API layer only sees the [`ItemStore`] and [`ProductStore`] traits; the
//! concrete stores are opened in `main` and injected through the app state.

pub mod documents;
pub mod error;
pub mod sqlite;

use async_trait::async_trait;

use crate::catalog::{Item, NewItem, NewProduct, Product};

pub use documents::DocumentStore;
pub use error::{StoreError, StoreResult};
pub use sqlite::SqliteItemStore;

/// Relational item operations
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// All items in store order
    async fn list(&self) -> StoreResult<Vec<Item>>;

    /// Insert an item and return it with its assigned id
    async fn create(&self, item: NewItem) -> StoreResult<Item>;

    /// Replace every field of an existing item
    async fn update(&self, id: i64, item: NewItem) -> StoreResult<Item>;

    async fn delete(&self, id: i64) -> StoreResult<()>;

    async fn count(&self) -> StoreResult<u64>;
}

/// Document product operations
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// All products in insertion order
    async fn list(&self) -> StoreResult<Vec<Product>>;

    /// Insert a product and return it with its generated id
    async fn create(&self, product: NewProduct) -> StoreResult<Product>;

    /// Replace the whole document, attributes included
    async fn update(&self, id: &str, product: NewProduct) -> StoreResult<Product>;

    async fn delete(&self, id: &str) -> StoreResult<()>;

    async fn count(&self) -> StoreResult<u64>;
}
