//! Shared application state

use pesp_lookup::LookupStore;
use std::sync::Arc;

use crate::{config::Config, db, services::LookupService, Result};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub lookups: LookupService,
}

impl AppState {
    /// Build state from configuration, connecting the configured store
    pub async fn new(config: Config) -> Result<Self> {
        let store = db::create_store(&config).await?;
        Ok(Self::with_store(config, store))
    }

    /// Build state over an existing store
    pub fn with_store(config: Config, store: Arc<dyn LookupStore>) -> Self {
        tracing::info!(backend = store.backend(), "Lookup store ready");
        Self {
            config: Arc::new(config),
            lookups: LookupService::new(store),
        }
    }
}
