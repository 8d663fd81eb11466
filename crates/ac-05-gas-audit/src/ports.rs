//! # Ports

use crate::errors::AuditError;
use async_trait::async_trait;
use shared_types::{Address, ContentId, ContractState};

/// Read access to an address's transaction history.
#[async_trait]
pub trait TransactionHistory: Send + Sync {
    /// `gasUsed` of every transaction touching `address`.
    async fn gas_used(&self, address: Address) -> Result<Vec<u64>, AuditError>;
}

/// Drives contracts through archival.
#[async_trait]
pub trait ArchiveDriver: Send + Sync {
    async fn archive(&self, address: Address) -> Result<ContentId, AuditError>;

    async fn state(&self, address: Address) -> Result<ContractState, AuditError>;
}
