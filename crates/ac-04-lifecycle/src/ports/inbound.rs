//! # Inbound Ports

use crate::domain::pending::PendingTransition;
use crate::errors::LifecycleError;
use async_trait::async_trait;
use serde::Serialize;
use shared_types::{Address, ContentId, ContractArtifact, ContractRecord, ContractState, TxHash};

/// Result of deploying and registering a contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployOutcome {
    pub address: Address,
    pub tx_hash: TxHash,
    pub registration_tx: TxHash,
    pub gas_used: u64,
}

/// One address whose state could not be read while listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingFailure {
    pub contract_address: Address,
    pub error: String,
    pub detail: String,
}

/// Archived contracts plus the addresses that could not be checked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchivedListing {
    pub archived: Vec<ContractRecord>,
    pub failures: Vec<ListingFailure>,
}

/// Lifecycle operations.
#[async_trait]
pub trait LifecycleApi: Send + Sync {
    /// Compile one source file into the build slot.
    async fn compile(&self, source: &[u8]) -> Result<ContractArtifact, LifecycleError>;

    /// Deploy the slot artifact named `contract_name`, then register it.
    async fn deploy(
        &self,
        contract_name: &str,
        constructor_args: &[serde_json::Value],
    ) -> Result<DeployOutcome, LifecycleError>;

    /// Register an address in state Active.
    async fn register(&self, address: Address) -> Result<TxHash, LifecycleError>;

    /// Archive an Active contract. Returns once the Pending write is
    /// confirmed; the Archived write follows after the configured delay.
    async fn archive(&self, address: Address) -> Result<ContentId, LifecycleError>;

    /// Current on-chain record.
    async fn get_state(&self, address: Address) -> Result<ContractRecord, LifecycleError>;

    /// Every registered contract in state Archived.
    async fn list_archived(&self) -> Result<ArchivedListing, LifecycleError>;

    /// Write a state directly, bypassing transition checks.
    async fn update_state(
        &self,
        address: Address,
        state: ContractState,
        content_id: &ContentId,
    ) -> Result<TxHash, LifecycleError>;

    /// Confirmations not yet written.
    async fn pending(&self) -> Result<Vec<PendingTransition>, LifecycleError>;
}
