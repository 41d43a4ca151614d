// src/state.rs

use std::sync::Arc;

use crate::api::ApiClient;
use crate::config::Config;
use crate::error::AppError;
use crate::storage::{DraftCache, KeyValueStore};

/// Everything a view needs from its surroundings. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub client: ApiClient,
    pub store: Arc<dyn KeyValueStore>,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn KeyValueStore>) -> Result<Self, AppError> {
        let client = ApiClient::new(&config)?;

        Ok(Self {
            client,
            store,
            config,
        })
    }

    pub fn drafts(&self) -> DraftCache {
        DraftCache::new(self.store.clone())
    }
}
