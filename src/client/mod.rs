//! Headless catalog client: HTTP access plus the form/list screen state

pub mod api;
pub mod form;
pub mod manager;

pub use api::{CatalogClient, ClientError, ClientResult, ItemsApi, ProductsApi};
pub use form::{ItemForm, ProductForm};
pub use manager::{ItemManager, ProductManager};
