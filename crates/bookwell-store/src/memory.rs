//! In-memory [`KeyValueStore`] used by tests, demos, and headless runs.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Mutex;

use crate::{KeyValueStore, StoreError};

/// A `HashMap` behind an async mutex.
///
/// Cloning a `MemoryStore` yields another handle to the SAME map, so a test
/// can keep one handle to inspect what the session layer wrote through the
/// other.
///
/// The store can be switched offline with [`MemoryStore::set_offline`];
/// while offline every operation fails with [`StoreError::Unavailable`].
/// This is how tests exercise the persistence-failure paths.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
    offline: Arc<AtomicBool>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with the given entries.
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let map = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            entries: Arc::new(Mutex::new(map)),
            offline: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Makes every subsequent operation fail (`true`) or succeed (`false`).
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Returns the number of stored keys.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    /// Returns `true` if nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store is offline".into()));
        }
        Ok(())
    }
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.check_online()?;
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.check_online()?;
        self.entries
            .lock()
            .await
            .insert(key.to_owned(), value.to_owned());
        tracing::debug!(key, "store entry written");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.check_online()?;
        self.entries.lock().await.remove(key);
        tracing::debug!(key, "store entry removed");
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.check_online()?;
        let mut entries = self.entries.lock().await;
        let count = entries.len();
        entries.clear();
        tracing::debug!(count, "store cleared");
        Ok(())
    }
}
