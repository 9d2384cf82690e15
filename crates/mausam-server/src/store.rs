//! Store selection from configuration

use std::sync::Arc;

use anyhow::{Context, Result};
use mausam_api::Backends;
use mausam_config::{AppConfig, StoreKind};
use mausam_core::{MemoryStore, WeatherSource};
use mausam_db::DbClient;
use tracing::{info, warn};

/// Process-scoped store handle, opened once at startup
pub enum StoreHandle {
    Memory(Arc<MemoryStore>),
    MySql(DbClient),
}

impl StoreHandle {
    pub async fn open(config: &AppConfig) -> Result<Self> {
        match config.store_kind()? {
            StoreKind::Memory => {
                warn!("Using in-memory store; readings are lost on exit");
                Ok(Self::Memory(Arc::new(MemoryStore::new())))
            }
            StoreKind::MySql(url) => {
                let client = DbClient::connect_and_migrate(&url)
                    .await
                    .context("Failed to connect to database")?;
                info!("Connected to database");
                Ok(Self::MySql(client))
            }
        }
    }

    pub fn backends(&self, source: Arc<dyn WeatherSource>) -> Backends {
        match self {
            Self::Memory(store) => Backends {
                readings: store.clone(),
                thresholds: store.clone(),
                source,
            },
            Self::MySql(client) => Backends {
                readings: Arc::new(client.clone()),
                thresholds: Arc::new(client.clone()),
                source,
            },
        }
    }

    pub async fn close(self) {
        if let Self::MySql(client) = self {
            client.close().await;
            info!("Database pool closed");
        }
    }
}
