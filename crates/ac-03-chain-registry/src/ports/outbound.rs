//! # Outbound Ports

use crate::domain::encoding::decode_revert_reason;
use crate::domain::transaction::{TxReceipt, TxRequest};
use crate::errors::ChainError;
use async_trait::async_trait;
use shared_types::{Address, TxHash};
use tracing::warn;

/// Minimal view of an EVM node plus a signing account.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Chain id used for replay protection.
    fn chain_id(&self) -> u64;

    /// Address that signs submitted transactions.
    fn sender(&self) -> Address;

    /// Deployed code at `address` (empty for accounts without code).
    async fn get_code(&self, address: Address) -> Result<Vec<u8>, ChainError>;

    /// Execute a read-only call against the latest block.
    ///
    /// A revert surfaces as `TransactionReverted` with the decoded reason.
    async fn call(&self, to: Address, data: Vec<u8>) -> Result<Vec<u8>, ChainError>;

    /// Sign and broadcast; returns once the node accepted the transaction.
    async fn send_transaction(&self, tx: TxRequest) -> Result<TxHash, ChainError>;

    /// Block until the transaction is mined.
    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<TxReceipt, ChainError>;

    /// Submit, wait for the receipt and fail on status 0.
    ///
    /// For reverted calls the reason is recovered by replaying the call
    /// against the latest block; the replay may succeed if state moved on,
    /// in which case the reason stays unknown.
    async fn transact(&self, tx: TxRequest) -> Result<TxReceipt, ChainError> {
        let replay = tx.to.map(|to| (to, tx.data.clone()));
        let tx_hash = self.send_transaction(tx).await?;
        let receipt = self.wait_for_receipt(tx_hash).await?;
        if receipt.success {
            return Ok(receipt);
        }

        let reason = match replay {
            Some((to, data)) => match self.call(to, data).await {
                Err(ChainError::TransactionReverted { reason, .. }) => reason,
                _ => None,
            },
            None => None,
        };
        warn!(%tx_hash, reason = ?reason, "Transaction reverted");
        Err(ChainError::TransactionReverted {
            tx_hash: Some(tx_hash),
            reason,
        })
    }
}

/// Turn raw revert data into a `TransactionReverted`.
#[must_use]
pub fn revert_from_data(data: &[u8]) -> ChainError {
    ChainError::TransactionReverted {
        tx_hash: None,
        reason: decode_revert_reason(data),
    }
}
