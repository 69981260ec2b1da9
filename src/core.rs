//! Core academy wiring
//!
//! `Academy` resolves the configured store backend once and hands out the
//! shared handle the HTTP layer runs every listing against.

use std::sync::Arc;
use std::time::Duration;

use config::{DatabaseConfig, StoreBackend};
use store_object::{MemoryStore, PgRecordStore, RecordStore};
use tracing::info;

use crate::errors::AcademyError;
use crate::schema::TABLES;
use crate::seed;

/// Owner of the process-wide store handle
#[derive(Debug, Clone)]
pub struct Academy {
    store: Arc<dyn RecordStore>,
}

impl Academy {
    /// Open the store named by `config.backend`
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, AcademyError> {
        let academy = match config.backend {
            StoreBackend::Postgres => Self::connect_postgres(config).await?,
            StoreBackend::Memory => Self::open_memory(config).await?,
        };

        info!("Using {} store", academy.store.backend_name());
        Ok(academy)
    }

    async fn connect_postgres(config: &DatabaseConfig) -> Result<Self, AcademyError> {
        let connection_string = config.connection_string();

        let mut pool_options = sqlx::postgres::PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout_seconds))
            .idle_timeout(Duration::from_secs(config.idle_timeout_seconds));

        // Set max lifetime if specified
        if config.max_lifetime_seconds > 0 {
            pool_options =
                pool_options.max_lifetime(Duration::from_secs(config.max_lifetime_seconds));
        }

        let pool = pool_options.connect(&connection_string).await?;

        Ok(Self::with_store(Arc::new(PgRecordStore::new(pool))))
    }

    async fn open_memory(config: &DatabaseConfig) -> Result<Self, AcademyError> {
        let store = MemoryStore::new();
        for table in TABLES {
            store.create_table(table).await?;
        }

        match &config.fixture_path {
            Some(path) => {
                store.load_fixture(path).await?;
            }
            None => seed::load(&store).await?,
        }

        Ok(Self::with_store(Arc::new(store)))
    }

    /// Wrap an already opened store
    pub fn with_store(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> Arc<dyn RecordStore> {
        Arc::clone(&self.store)
    }

    /// Check store health
    pub async fn health_check(&self) -> Result<(), AcademyError> {
        self.store.ping().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_backend_is_seeded() {
        let config = DatabaseConfig {
            backend: StoreBackend::Memory,
            ..DatabaseConfig::default()
        };

        let academy = Academy::connect(&config).await.unwrap();
        assert_eq!(academy.store().backend_name(), "memory");
        academy.health_check().await.unwrap();
    }

    #[tokio::test]
    async fn test_memory_backend_missing_fixture() {
        let config = DatabaseConfig {
            backend: StoreBackend::Memory,
            fixture_path: Some("/nonexistent/fixture.json".to_string()),
            ..DatabaseConfig::default()
        };

        let err = Academy::connect(&config).await.unwrap_err();
        assert!(matches!(err, AcademyError::Store(_)));
    }
}
