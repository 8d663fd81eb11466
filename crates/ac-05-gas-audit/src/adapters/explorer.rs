//! Transaction history from the block explorer.

use crate::errors::AuditError;
use crate::ports::TransactionHistory;
use ac_03_chain_registry::adapters::BlockscoutExplorer;
use async_trait::async_trait;
use shared_types::Address;
use std::sync::Arc;

pub struct ExplorerHistory {
    explorer: Arc<BlockscoutExplorer>,
}

impl ExplorerHistory {
    pub fn new(explorer: Arc<BlockscoutExplorer>) -> Self {
        Self { explorer }
    }
}

#[async_trait]
impl TransactionHistory for ExplorerHistory {
    async fn gas_used(&self, address: Address) -> Result<Vec<u64>, AuditError> {
        let transactions = self
            .explorer
            .transactions(address)
            .await
            .map_err(|e| AuditError::HistoryUnavailable {
                address,
                detail: e.to_string(),
            })?;
        // Reverted transactions still paid for their gas.
        Ok(transactions.iter().map(|tx| tx.gas_used).collect())
    }
}
