//! Explorer-backed `SourceFetcher` for the lifecycle orchestrator.

use ac_03_chain_registry::adapters::{BlockscoutExplorer, ExplorerError};
use ac_04_lifecycle::errors::SourceFetchError;
use ac_04_lifecycle::ports::outbound::SourceFetcher;
use async_trait::async_trait;
use serde_json::Value;
use shared_types::Address;
use std::sync::Arc;

/// Fetches verified source and metadata from Blockscout.
pub struct ExplorerSourceFetcher {
    explorer: Arc<BlockscoutExplorer>,
}

impl ExplorerSourceFetcher {
    pub fn new(explorer: Arc<BlockscoutExplorer>) -> Self {
        Self { explorer }
    }
}

fn source_error(err: ExplorerError) -> SourceFetchError {
    match err {
        ExplorerError::NotFound(address) => SourceFetchError::NotFound(address),
        other => SourceFetchError::Unavailable(other.to_string()),
    }
}

#[async_trait]
impl SourceFetcher for ExplorerSourceFetcher {
    async fn fetch(&self, address: Address) -> Result<Value, SourceFetchError> {
        self.explorer
            .contract_source(address)
            .await
            .map_err(source_error)
    }
}
