//! Application state shared across handlers

use crate::catalog::CatalogClient;
use crate::config::Settings;
use crate::search::SearchService;
use std::sync::Arc;

/// Shared application state
///
/// Everything a handler needs arrives through this object; there is no
/// process-wide mutable state anywhere in the application.
#[derive(Clone)]
pub struct AppState {
    /// Loaded settings
    pub settings: Arc<Settings>,
    /// Catalog API client
    pub catalog: Arc<CatalogClient>,
    /// Cached search execution
    pub search: Arc<SearchService>,
    /// Template renderer
    pub templates: Arc<super::Templates>,
}

impl AppState {
    /// Create new application state
    pub fn new(settings: Settings, catalog: CatalogClient) -> anyhow::Result<Self> {
        let search = Arc::new(SearchService::new(catalog.clone(), &settings.cache));
        let templates = Arc::new(super::Templates::new()?);

        Ok(Self {
            settings: Arc::new(settings),
            catalog: Arc::new(catalog),
            search,
            templates,
        })
    }

    /// Get instance name
    pub fn instance_name(&self) -> &str {
        &self.settings.general.instance_name
    }

    /// Check if instance is public
    pub fn is_public(&self) -> bool {
        self.settings.server.public_instance
    }
}
