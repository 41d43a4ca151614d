// src/storage/draft.rs

use std::sync::Arc;

use serde::Deserialize;

use super::KeyValueStore;
use crate::models::answer::{AnswerEntry, Draft};

pub const DRAFT_KEY_PREFIX: &str = "assignment_draft_";

pub fn draft_key(assignment_id: &str) -> String {
    format!("{}{}", DRAFT_KEY_PREFIX, assignment_id)
}

/// Shape a cached draft must have to be adopted. Extra fields are ignored.
#[derive(Deserialize)]
struct StoredDraft {
    answers: Vec<AnswerEntry>,
}

/// Draft persistence on top of a [`KeyValueStore`].
///
/// Every operation is best-effort: the in-memory draft stays authoritative
/// for the session, so storage failures are logged and dropped.
#[derive(Clone)]
pub struct DraftCache {
    store: Arc<dyn KeyValueStore>,
}

impl DraftCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// The cached draft for `assignment_id`, if one exists and is well-formed.
    pub async fn load(&self, assignment_id: &str) -> Option<Draft> {
        let key = draft_key(assignment_id);

        let raw = match self.store.get(&key).await {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!("Failed to read draft {}: {}", key, e);
                return None;
            }
        };

        match serde_json::from_str::<StoredDraft>(&raw) {
            Ok(stored) => Some(Draft {
                answers: stored.answers,
            }),
            Err(e) => {
                tracing::warn!("Discarding malformed draft {}: {}", key, e);
                None
            }
        }
    }

    pub async fn save(&self, assignment_id: &str, draft: &Draft) {
        let key = draft_key(assignment_id);

        let raw = match serde_json::to_string(draft) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("Failed to serialise draft {}: {}", key, e);
                return;
            }
        };

        if let Err(e) = self.store.set(&key, &raw).await {
            tracing::warn!("Failed to save draft {}: {}", key, e);
        }
    }

    pub async fn clear(&self, assignment_id: &str) {
        let key = draft_key(assignment_id);

        if let Err(e) = self.store.remove(&key).await {
            tracing::warn!("Failed to clear draft {}: {}", key, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::answer::AnswerValue;
    use crate::models::assignment::QuestionId;
    use crate::storage::MemoryStore;

    #[tokio::test]
    async fn test_save_then_load_returns_same_draft() {
        let cache = DraftCache::new(Arc::new(MemoryStore::new()));
        let mut draft = Draft::default();
        draft.set(QuestionId(0), AnswerValue::from("B"));

        cache.save("a1", &draft).await;

        assert_eq!(cache.load("a1").await, Some(draft));
        assert_eq!(cache.load("a2").await, None);
    }

    #[tokio::test]
    async fn test_malformed_draft_is_ignored() {
        let store = Arc::new(MemoryStore::new());
        store.set(&draft_key("a1"), r#"{"answer": []}"#).await.unwrap();
        store.set(&draft_key("a2"), "][").await.unwrap();
        let cache = DraftCache::new(store);

        assert_eq!(cache.load("a1").await, None);
        assert_eq!(cache.load("a2").await, None);
    }

    #[tokio::test]
    async fn test_clear_removes_draft() {
        let cache = DraftCache::new(Arc::new(MemoryStore::new()));
        cache.save("a1", &Draft::default()).await;
        cache.clear("a1").await;

        assert_eq!(cache.load("a1").await, None);
    }

    #[test]
    fn test_draft_key_format() {
        assert_eq!(draft_key("42"), "assignment_draft_42");
    }
}
