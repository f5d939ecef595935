//! Application state shared across routes

use std::sync::Arc;

use crate::config::Config;
use crate::store::{ItemStore, ProductStore};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub items: Arc<dyn ItemStore>,
    pub products: Arc<dyn ProductStore>,
}

impl AppState {
    /// Stores are opened by the caller and only borrowed by the routes
    pub fn new(
        config: Config,
        items: Arc<dyn ItemStore>,
        products: Arc<dyn ProductStore>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            items,
            products,
        }
    }
}
