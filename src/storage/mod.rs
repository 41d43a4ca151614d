// src/storage/mod.rs

//! Local key-value persistence.
//!
//! Views never touch a concrete store: they hold an `Arc<dyn KeyValueStore>`
//! so drafts and the cached user can live in SQLite for the CLI and in memory
//! for tests.

pub mod draft;
pub mod sqlite;

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::user::CachedUser;

pub use draft::{DraftCache, draft_key};
pub use sqlite::SqliteStore;

/// Storage key of the cached learner identity.
pub const USER_KEY: &str = "user";

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), AppError>;
    async fn remove(&self, key: &str) -> Result<(), AppError>;
}

/// Process-local store. Contents vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, AppError> {
        self.entries
            .lock()
            .map_err(|e| AppError::Storage(e.to_string()))
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.lock()?.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), AppError> {
        self.lock()?.remove(key);
        Ok(())
    }
}

/// Reads the cached learner. Absent, unreadable and malformed records all
/// count as "no user".
pub async fn load_cached_user(store: &dyn KeyValueStore) -> Option<CachedUser> {
    let raw = match store.get(USER_KEY).await {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!("Failed to read cached user: {}", e);
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(user) => Some(user),
        Err(e) => {
            tracing::warn!("Ignoring malformed cached user record: {}", e);
            None
        }
    }
}

pub async fn remember_user(store: &dyn KeyValueStore, user: &CachedUser) -> Result<(), AppError> {
    let raw = serde_json::to_string(user)?;
    store.set(USER_KEY, &raw).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_get_set_remove() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k").await.unwrap(), None);

        store.set("k", "v1").await.unwrap();
        store.set("k", "v2").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v2"));

        store.remove("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_cached_user_round_trip_and_garbage() {
        let store = MemoryStore::new();
        assert!(load_cached_user(&store).await.is_none());

        store.set(USER_KEY, "{not json").await.unwrap();
        assert!(load_cached_user(&store).await.is_none());

        store.set(USER_KEY, r#"{"id": 17, "name": "Alice"}"#).await.unwrap();
        let user = load_cached_user(&store).await.unwrap();
        assert_eq!(user.id, "17");
        assert_eq!(user.name.as_deref(), Some("Alice"));
    }
}
