//! JSON-file-backed [`KeyValueStore`] for desktop and CLI hosts.
//!
//! The whole map lives in one JSON object on disk. Every write rewrites
//! the file through a sibling temp file and a rename, so a crash mid-write
//! leaves either the old map or the new one, never half of each.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::sync::Mutex;

use crate::{KeyValueStore, StoreError};

/// A persisted store backed by a single JSON file.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl JsonFileStore {
    /// Opens (lazily) a store at `path`. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Returns the file path this store writes to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self, key: &str) -> Result<HashMap<String, String>, StoreError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Ok(HashMap::new()),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| StoreError::Read {
                key: key.to_owned(),
                reason: format!("corrupt store file: {e}"),
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(StoreError::Read {
                key: key.to_owned(),
                reason: e.to_string(),
            }),
        }
    }

    async fn save(
        &self,
        key: &str,
        entries: &HashMap<String, String>,
    ) -> Result<(), StoreError> {
        let write_err = |reason: String| StoreError::Write {
            key: key.to_owned(),
            reason,
        };

        let bytes = serde_json::to_vec(entries).map_err(|e| write_err(e.to_string()))?;
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, bytes)
            .await
            .map_err(|e| write_err(e.to_string()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| write_err(e.to_string()))?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let _guard = self.lock.lock().await;
        Ok(self.load(key).await?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load(key).await?;
        entries.insert(key.to_owned(), value.to_owned());
        self.save(key, &entries).await
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load(key).await?;
        if entries.remove(key).is_none() {
            return Ok(());
        }
        self.save(key, &entries).await
    }

    async fn clear(&self) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Write {
                key: "*".into(),
                reason: e.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A unique path under the system temp dir. Each test gets its own
    /// file so tests can run in parallel.
    fn temp_path(name: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!(
            "bookwell-store-{}-{}.json",
            name,
            std::process::id()
        ));
        path
    }

    #[tokio::test]
    async fn test_get_without_file_returns_none() {
        let store = JsonFileStore::new(temp_path("missing"));

        assert!(store.get("token").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_persists_across_instances() {
        let path = temp_path("persist");
        JsonFileStore::new(&path).set("token", "abc").await.unwrap();

        let reopened = JsonFileStore::new(&path);

        assert_eq!(reopened.get("token").await.unwrap().as_deref(), Some("abc"));
        reopened.clear().await.unwrap();
    }

    #[tokio::test]
    async fn test_remove_keeps_other_keys() {
        let store = JsonFileStore::new(temp_path("remove"));
        store.set("token", "abc").await.unwrap();
        store.set("lastBusinessId", "biz-9").await.unwrap();

        store.remove("token").await.unwrap();

        assert!(store.get("token").await.unwrap().is_none());
        assert_eq!(
            store.get("lastBusinessId").await.unwrap().as_deref(),
            Some("biz-9")
        );
        store.clear().await.unwrap();
    }

    #[tokio::test]
    async fn test_clear_deletes_file() {
        let store = JsonFileStore::new(temp_path("clear"));
        store.set("token", "abc").await.unwrap();

        store.clear().await.unwrap();

        assert!(!store.path().exists());
        assert!(store.get("token").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_file_returns_read_error() {
        let path = temp_path("corrupt");
        tokio::fs::write(&path, b"not json").await.unwrap();
        let store = JsonFileStore::new(&path);

        let result = store.get("token").await;

        assert!(
            matches!(result, Err(StoreError::Read { ref key, .. }) if key == "token"),
            "expected read error, got {result:?}"
        );
        store.clear().await.unwrap();
    }
}
