use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{info, warn};

use shared_config::AppConfig;

use crate::collection::Collection;
use crate::collections;
use crate::error::StoreError;
use crate::memory::MemoryStore;
use crate::rest::RestStore;
use crate::store::DocumentStore;

/// Everything a request handler may reach: immutable configuration and the
/// shared store handle. Built once at startup.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn DocumentStore>,
}

impl AppContext {
    pub fn new(config: AppConfig, store: Arc<dyn DocumentStore>) -> Self {
        Self {
            config: Arc::new(config),
            store,
        }
    }

    /// Picks the REST store when `DATABASE_URL` is configured, the
    /// in-memory store otherwise.
    pub fn from_config(config: AppConfig) -> Self {
        let store: Arc<dyn DocumentStore> = if config.uses_remote_store() {
            info!("Using REST document store at {}", config.database_url);
            Arc::new(RestStore::new(&config))
        } else {
            warn!("Using in-memory document store; data is lost on restart");
            Arc::new(MemoryStore::new())
        };

        Self::new(config, store)
    }

    /// Declares the unique keys that turn racing duplicate writes into
    /// duplicate-key errors.
    pub async fn ensure_indexes(&self) -> Result<(), StoreError> {
        self.store
            .create_unique_index(collections::BOOKINGS, collections::BOOKING_UNIQUE_KEY)
            .await?;
        self.store
            .create_unique_index(collections::USERS, collections::USER_UNIQUE_KEY)
            .await?;
        Ok(())
    }

    pub fn collection<T>(&self, name: &'static str) -> Collection<T>
    where
        T: Serialize + DeserializeOwned,
    {
        Collection::new(Arc::clone(&self.store), name)
    }
}
