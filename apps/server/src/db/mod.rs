//! Database layer - lookup store backends

pub mod postgres;

use pesp_lookup::{LookupStore, MemoryStore};
use std::sync::Arc;

use crate::config::{Config, StoreBackend};
use crate::{Error, Result};

pub use postgres::{PostgresLookupSession, PostgresLookupStore};

/// Build the configured lookup store
pub async fn create_store(config: &Config) -> Result<Arc<dyn LookupStore>> {
    match config.store.backend {
        StoreBackend::Postgres => {
            let pool = postgres::connect(&config.database).await?;
            if config.database.run_migrations {
                tracing::info!("Running database migrations");
                postgres::run_migrations(&pool).await?;
            }
            Ok(Arc::new(PostgresLookupStore::new(
                pool,
                config.database.statement_timeout_seconds,
            )))
        }
        StoreBackend::Memory => {
            let store = match &config.store.seed_file {
                Some(path) => {
                    let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
                        Error::Config(format!("read seed file {}: {e}", path.display()))
                    })?;
                    let seed = serde_json::from_str(&raw).map_err(|e| {
                        Error::Config(format!("parse seed file {}: {e}", path.display()))
                    })?;
                    MemoryStore::from_seed(seed)?
                }
                None => MemoryStore::new(),
            };
            tracing::info!(tables = ?store.table_sizes()?, "Memory lookup store seeded");
            Ok(Arc::new(store))
        }
    }
}
