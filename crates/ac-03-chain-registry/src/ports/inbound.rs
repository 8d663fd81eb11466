//! # Inbound Ports
//!
//! APIs this component exposes to the lifecycle orchestrator.

use crate::errors::ChainError;
use async_trait::async_trait;
use shared_types::{Address, ContentId, ContractArtifact, ContractRecord, ContractState, TxHash};

/// Outcome of a successful deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployedContract {
    pub address: Address,
    pub tx_hash: TxHash,
    pub gas_used: u64,
}

/// Deploys compiled artifacts.
#[async_trait]
pub trait ContractDeployer: Send + Sync {
    /// Deploy `artifact` with JSON constructor arguments.
    ///
    /// Succeeds only when code is present at the resulting address.
    async fn deploy(
        &self,
        artifact: &ContractArtifact,
        constructor_args: &[serde_json::Value],
    ) -> Result<DeployedContract, ChainError>;
}

/// Typed access to the on-chain registry contract.
///
/// Writes return after the transaction is mined successfully.
#[async_trait]
pub trait ContractRegistry: Send + Sync {
    /// `addContract(address)`
    async fn add_contract(&self, address: Address) -> Result<TxHash, ChainError>;

    /// `updateContractState(address, uint8, string)`
    async fn update_state(
        &self,
        address: Address,
        state: ContractState,
        content_id: &ContentId,
    ) -> Result<TxHash, ChainError>;

    /// `getContractState(address)`
    async fn get_state(&self, address: Address) -> Result<ContractRecord, ChainError>;

    /// `getAllContracts()`, in registration order.
    async fn get_all_addresses(&self) -> Result<Vec<Address>, ChainError>;
}
