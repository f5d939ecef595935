//! Catalog Server - product catalog REST API
//!
//! Serves two independent catalogs:
//! - `/api/items` backed by a relational table (SQLite)
//! - `/api/products` backed by an embedded document collection with free-form attributes
//!
//! The [`client`] module holds the matching HTTP client and the headless form/list
//! state used by catalog screens.

pub mod app;
pub mod catalog;
pub mod client;
pub mod config;
pub mod http;
pub mod store;
pub mod util;

pub use app::AppState;
pub use config::Config;
pub use http::build_router;
