use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use study_core::model::{ArticleId, QuizProgress, SavedArticle, Theme};
use thiserror::Error;

use crate::kv::KvRepository;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("storage quota exceeded: {needed} bytes needed, {quota} allowed")]
    QuotaExceeded { needed: usize, quota: usize },
}

//
// ─── KEY-VALUE STORE ───────────────────────────────────────────────────────────
//

/// String-keyed document store, the local-storage contract of the app.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be written.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// In-memory store, used for the session scope and for tests.
///
/// An optional byte quota mimics browser storage limits.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
    quota: Option<usize>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject writes that would push the total stored bytes past `quota`.
    #[must_use]
    pub fn with_quota(quota: usize) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            quota: Some(quota),
        }
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        if let Some(quota) = self.quota {
            let others: usize = guard
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = others + key.len() + value.len();
            if needed > quota {
                return Err(StorageError::QuotaExceeded { needed, quota });
            }
        }
        guard.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(key);
        Ok(())
    }
}

//
// ─── TYPED REPOSITORIES ────────────────────────────────────────────────────────
//

/// Saved-article library kept as one list under one key.
#[async_trait]
pub trait LibraryRepository: Send + Sync {
    /// All saved articles, newest `saved_at` first regardless of stored order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn list_articles(&self) -> Result<Vec<SavedArticle>, StorageError>;

    /// Prepend `article` to the stored list and return the updated list.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the list cannot be read or written.
    async fn prepend_article(
        &self,
        article: &SavedArticle,
    ) -> Result<Vec<SavedArticle>, StorageError>;

    /// Remove the article with `id` (if present) and return the updated list.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the list cannot be read or written.
    async fn delete_article(&self, id: &ArticleId) -> Result<Vec<SavedArticle>, StorageError>;
}

/// Single-slot store for the in-flight quiz snapshot.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the stored snapshot is unreadable.
    async fn load_progress(&self) -> Result<Option<QuizProgress>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the snapshot cannot be written.
    async fn save_progress(&self, progress: &QuizProgress) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the slot cannot be cleared.
    async fn clear_progress(&self) -> Result<(), StorageError>;
}

#[async_trait]
pub trait PreferencesRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn get_theme(&self) -> Result<Option<Theme>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    async fn set_theme(&self, theme: Theme) -> Result<(), StorageError>;
}

/// Manually entered API key. Backed by a session-scoped store.
#[async_trait]
pub trait CredentialRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn get_api_key(&self) -> Result<Option<String>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    async fn set_api_key(&self, key: &str) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    async fn clear_api_key(&self) -> Result<(), StorageError>;
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub library: Arc<dyn LibraryRepository>,
    pub progress: Arc<dyn ProgressRepository>,
    pub preferences: Arc<dyn PreferencesRepository>,
    pub credentials: Arc<dyn CredentialRepository>,
}

impl Storage {
    /// Wire repositories over a persistent store and a session-scoped store.
    #[must_use]
    pub fn from_stores(
        persistent: Arc<dyn KeyValueStore>,
        session: Arc<dyn KeyValueStore>,
    ) -> Self {
        let persistent = KvRepository::new(persistent);
        let session = KvRepository::new(session);
        Self {
            library: Arc::new(persistent.clone()),
            progress: Arc::new(persistent.clone()),
            preferences: Arc::new(persistent),
            credentials: Arc::new(session),
        }
    }

    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_stores(
            Arc::new(InMemoryStore::new()),
            Arc::new(InMemoryStore::new()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn in_memory_store_round_trips_values() {
        let store = InMemoryStore::new();
        assert_eq!(store.get("k").await.unwrap(), None);
        store.set("k", "v").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));
        store.remove("k").await.unwrap();
        store.remove("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn quota_rejects_oversized_writes() {
        let store = InMemoryStore::with_quota(8);
        store.set("a", "1234").await.unwrap();
        let err = store.set("b", "123456").await.unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { needed: 12, quota: 8 }));
        // replacing an existing key only counts the new value
        store.set("a", "1234567").await.unwrap();
    }
}
