//! # Outbound Ports

use crate::domain::pending::PendingTransition;
use crate::errors::{PersistenceError, SourceFetchError};
use async_trait::async_trait;
use shared_types::Address;

/// Supplies the source code and metadata that gets archived.
#[async_trait]
pub trait SourceFetcher: Send + Sync {
    async fn fetch(&self, address: Address) -> Result<serde_json::Value, SourceFetchError>;
}

/// Durable storage for deferred confirmations, at most one per address.
///
/// A `put` must be durable when it returns.
#[async_trait]
pub trait PendingTransitionStore: Send + Sync {
    /// Insert or replace the record for `transition.address`.
    async fn put(&self, transition: &PendingTransition) -> Result<(), PersistenceError>;

    /// Delete the record for `address`; deleting a missing record is a no-op.
    async fn remove(&self, address: Address) -> Result<(), PersistenceError>;

    async fn get(&self, address: Address) -> Result<Option<PendingTransition>, PersistenceError>;

    /// Every stored record, ordered by address.
    async fn list(&self) -> Result<Vec<PendingTransition>, PersistenceError>;
}
