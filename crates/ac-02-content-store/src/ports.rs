//! # Content Store Port

use crate::errors::StoreError;
use async_trait::async_trait;
use shared_types::ContentId;

/// A content-addressed blob store.
///
/// `ContentId`s are opaque to callers. Implementations must be
/// deterministic (identical input, identical id) and must never return an
/// id for an upload that did not fully land.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Store a JSON blob and return its content id.
    async fn upload(&self, blob: &serde_json::Value) -> Result<ContentId, StoreError>;

    /// Fetch the blob stored under `id`.
    async fn retrieve(&self, id: &ContentId) -> Result<serde_json::Value, StoreError>;
}
