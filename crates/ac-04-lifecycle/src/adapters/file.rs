//! # File Pending Store
//!
//! All records live in one JSON document. Every mutation rewrites it to a
//! sibling temp file, fsyncs, and renames over the original, so a crash
//! leaves either the old or the new document, never a torn one.

use crate::domain::pending::PendingTransition;
use crate::errors::PersistenceError;
use crate::ports::outbound::PendingTransitionStore;
use async_trait::async_trait;
use shared_types::Address;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// JSON-file backed `PendingTransitionStore`.
#[derive(Debug)]
pub struct FilePendingStore {
    path: PathBuf,
    records: Mutex<BTreeMap<Address, PendingTransition>>,
}

impl FilePendingStore {
    /// Open the store at `path`, loading existing records.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, PersistenceError> {
        let path = path.into();
        let records = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.is_empty() => BTreeMap::new(),
            Ok(bytes) => {
                let list: Vec<PendingTransition> = serde_json::from_slice(&bytes)
                    .map_err(|e| PersistenceError::Corrupt(format!("{}: {e}", path.display())))?;
                list.into_iter().map(|t| (t.address, t)).collect()
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        info!(path = %path.display(), records = records.len(), "Opened pending transition store");
        Ok(Self {
            path,
            records: Mutex::new(records),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn flush(&self, records: &BTreeMap<Address, PendingTransition>) -> Result<(), PersistenceError> {
        let list: Vec<&PendingTransition> = records.values().collect();
        let bytes = serde_json::to_vec_pretty(&list)
            .map_err(|e| PersistenceError::Corrupt(e.to_string()))?;

        let tmp = self.path.with_extension("json.tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(&bytes).await?;
        file.sync_all().await?;
        drop(file);
        tokio::fs::rename(&tmp, &self.path).await?;
        debug!(records = list.len(), "Flushed pending transitions");
        Ok(())
    }
}

#[async_trait]
impl PendingTransitionStore for FilePendingStore {
    async fn put(&self, transition: &PendingTransition) -> Result<(), PersistenceError> {
        let mut records = self.records.lock().await;
        let previous = records.insert(transition.address, transition.clone());
        if let Err(err) = self.flush(&records).await {
            // Keep memory consistent with disk.
            match previous {
                Some(old) => records.insert(old.address, old),
                None => records.remove(&transition.address),
            };
            return Err(err);
        }
        Ok(())
    }

    async fn remove(&self, address: Address) -> Result<(), PersistenceError> {
        let mut records = self.records.lock().await;
        let Some(previous) = records.remove(&address) else {
            return Ok(());
        };
        if let Err(err) = self.flush(&records).await {
            records.insert(address, previous);
            return Err(err);
        }
        Ok(())
    }

    async fn get(&self, address: Address) -> Result<Option<PendingTransition>, PersistenceError> {
        Ok(self.records.lock().await.get(&address).cloned())
    }

    async fn list(&self) -> Result<Vec<PendingTransition>, PersistenceError> {
        Ok(self.records.lock().await.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::time::Duration;

    fn transition(byte: u8) -> PendingTransition {
        PendingTransition::archive(
            Address([byte; 20]),
            format!("Qm{byte}").into(),
            Utc::now(),
            Duration::from_secs(60),
        )
    }

    #[tokio::test]
    async fn test_records_survive_reopen() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join("pending.json");
        let store = FilePendingStore::open(&path).await.unwrap();

        // Act
        store.put(&transition(1)).await.unwrap();
        store.put(&transition(2)).await.unwrap();
        store.remove(Address([1; 20])).await.unwrap();
        drop(store);
        let reopened = FilePendingStore::open(&path).await.unwrap();

        // Assert
        let records = reopened.list().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].address, Address([2; 20]));
        assert!(reopened.get(Address([1; 20])).await.unwrap().is_none());
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn test_put_replaces_existing_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilePendingStore::open(dir.path().join("p.json")).await.unwrap();
        let mut t = transition(3);
        store.put(&t).await.unwrap();
        t.content_id = "QmOther".into();
        store.put(&t).await.unwrap();

        let records = store.list().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].content_id.as_str(), "QmOther");
    }

    #[tokio::test]
    async fn test_corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("p.json");
        std::fs::write(&path, b"{not json").unwrap();
        let err = FilePendingStore::open(&path).await.unwrap_err();
        assert!(matches!(err, PersistenceError::Corrupt(_)));
    }

    #[tokio::test]
    async fn test_remove_missing_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("p.json");
        let store = FilePendingStore::open(&path).await.unwrap();
        store.remove(Address([9; 20])).await.unwrap();
        assert!(!path.exists());
    }
}
