//! # In-Memory Content Store
//!
//! Content ids are `sha256-<hex>` over the serialized blob, so the store is
//! deterministic and collision-resistant like a real content-addressed
//! backend.

use crate::errors::StoreError;
use crate::ports::ContentStore;
use async_trait::async_trait;
use parking_lot::RwLock;
use sha2::{Digest, Sha256};
use shared_types::ContentId;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

/// Process-local content store.
#[derive(Debug, Default)]
pub struct InMemoryContentStore {
    blobs: RwLock<HashMap<ContentId, Vec<u8>>>,
    offline: AtomicBool,
}

impl InMemoryContentStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Content id for a serialized blob.
    #[must_use]
    pub fn content_id_for(bytes: &[u8]) -> ContentId {
        ContentId::new(format!("sha256-{}", hex::encode(Sha256::digest(bytes))))
    }

    /// Simulate the store going down (every call fails with `StoreUnavailable`).
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Serialized bytes stored under `id`.
    #[must_use]
    pub fn raw(&self, id: &ContentId) -> Option<Vec<u8>> {
        self.blobs.read().get(id).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.blobs.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blobs.read().is_empty()
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::StoreUnavailable("store offline".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl ContentStore for InMemoryContentStore {
    async fn upload(&self, blob: &serde_json::Value) -> Result<ContentId, StoreError> {
        self.check_online()?;
        let bytes = serde_json::to_vec(blob)
            .map_err(|e| StoreError::InvalidResponse(format!("unserializable blob: {e}")))?;
        let id = Self::content_id_for(&bytes);
        self.blobs.write().insert(id.clone(), bytes);
        Ok(id)
    }

    async fn retrieve(&self, id: &ContentId) -> Result<serde_json::Value, StoreError> {
        self.check_online()?;
        let bytes = self
            .raw(id)
            .ok_or_else(|| StoreError::ContentNotFound(id.clone()))?;
        serde_json::from_slice(&bytes).map_err(|e| StoreError::InvalidResponse(e.to_string()))
    }
}
