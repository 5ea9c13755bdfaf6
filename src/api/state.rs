use std::sync::Arc;

use crate::services::CatalogProvider;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogProvider>,
}

impl AppState {
    /// Creates state around the catalog provider every handler talks to
    pub fn new(catalog: Arc<dyn CatalogProvider>) -> Self {
        Self { catalog }
    }
}
