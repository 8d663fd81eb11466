//! # Service Container
//!
//! Builds every component from `NodeConfig` and connects them through their
//! ports:
//!
//! ```text
//! ApiGateway ──> LifecycleOrchestrator ──> SourceCompiler ──> CommandToolchain
//!     │                   ├──────────────> Deployer ─────────┐
//!     │                   ├──────────────> RegistryGateway ──┴─> JsonRpcChainClient
//!     │                   ├──────────────> ContentStore (Pinata | memory)
//!     │                   ├──────────────> ExplorerSourceFetcher ──> Blockscout
//!     │                   └──────────────> PendingTransitionStore (file | rocksdb)
//!     └──> GasAudit ──> ExplorerHistory, LifecycleArchiveDriver
//! ```

pub mod config;

pub use config::{ConfigError, LoggingConfig, NodeConfig, StorageBackend, StorageConfig};

use crate::adapters::ExplorerSourceFetcher;
use ac_01_source_compiler::prelude::*;
use ac_02_content_store::{
    ContentStore, ContentStoreBackend, ContentStoreConfig, InMemoryContentStore,
    PinataContentStore,
};
use ac_03_chain_registry::prelude::*;
use ac_04_lifecycle::prelude::*;
use ac_05_gas_audit::{ExplorerHistory, GasAudit, LifecycleArchiveDriver};
use ac_06_api_gateway::AppState;
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};

/// Every long-lived component of a running node.
pub struct ServiceContainer {
    pub config: NodeConfig,
    pub chain: Arc<JsonRpcChainClient>,
    pub orchestrator: Arc<LifecycleOrchestrator>,
    pub gas_audit: Arc<GasAudit>,
}

impl ServiceContainer {
    /// Build all components. Performs no network calls.
    pub async fn build(config: NodeConfig) -> Result<Self> {
        let registry_config = config
            .registry
            .clone()
            .context("registry configuration missing")?;

        let toolchain = Arc::new(CommandToolchain::from_config(&config.compiler));
        let compiler = Arc::new(SourceCompiler::new(&config.compiler, toolchain));

        let chain = Arc::new(
            JsonRpcChainClient::new(config.chain.clone()).context("invalid chain configuration")?,
        );
        let deployer: Arc<dyn ContractDeployer> = Arc::new(Deployer::new(chain.clone()));
        let registry: Arc<dyn ContractRegistry> = Arc::new(
            RegistryGateway::new(chain.clone(), registry_config)
                .context("invalid registry configuration")?,
        );

        let content_store = build_content_store(&config.content_store)?;

        let explorer = Arc::new(
            BlockscoutExplorer::new(config.explorer.clone()).context("invalid explorer configuration")?,
        );
        let source_fetcher: Arc<dyn SourceFetcher> =
            Arc::new(ExplorerSourceFetcher::new(explorer.clone()));

        let pending_store = open_pending_store(&config.storage).await?;

        let orchestrator = Arc::new(LifecycleOrchestrator::new(
            LifecycleDependencies {
                compiler,
                deployer,
                registry,
                content_store,
                source_fetcher,
                pending_store,
            },
            config.lifecycle.clone(),
        ));

        let lifecycle: Arc<dyn LifecycleApi> = orchestrator.clone();
        let gas_audit = Arc::new(GasAudit::new(
            Arc::new(ExplorerHistory::new(explorer)),
            Arc::new(LifecycleArchiveDriver::new(lifecycle)),
            config.audit.clone(),
        ));

        info!(
            chain_id = config.chain.chain_id,
            registry = %config.registry.as_ref().map(|r| r.address.to_string()).unwrap_or_default(),
            storage = ?config.storage.backend,
            "Service container built"
        );
        Ok(Self {
            config,
            chain,
            orchestrator,
            gas_audit,
        })
    }

    /// Handler state for the API gateway.
    #[must_use]
    pub fn app_state(&self) -> AppState {
        AppState {
            lifecycle: self.orchestrator.clone(),
            gas_audit: self.gas_audit.clone(),
        }
    }
}

fn build_content_store(config: &ContentStoreConfig) -> Result<Arc<dyn ContentStore>> {
    match config.backend {
        ContentStoreBackend::Pinata => Ok(Arc::new(
            PinataContentStore::new(config.clone()).context("invalid content store configuration")?,
        )),
        ContentStoreBackend::Memory => {
            warn!("Using the in-memory content store; archived content is lost on restart");
            Ok(Arc::new(InMemoryContentStore::new()))
        }
    }
}

async fn open_pending_store(config: &StorageConfig) -> Result<Arc<dyn PendingTransitionStore>> {
    match config.backend {
        StorageBackend::File => {
            let path = config.pending_file();
            let store = FilePendingStore::open(&path)
                .await
                .with_context(|| format!("failed to open pending store {}", path.display()))?;
            Ok(Arc::new(store))
        }
        #[cfg(feature = "rocksdb")]
        StorageBackend::Rocksdb => {
            let path = config.rocksdb_dir();
            let store = RocksDbPendingStore::open(&path)
                .with_context(|| format!("failed to open pending store {}", path.display()))?;
            info!(path = %path.display(), "Opened RocksDB pending store");
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "rocksdb"))]
        StorageBackend::Rocksdb => {
            anyhow::bail!("storage backend rocksdb requires the `rocksdb` feature")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_file_pending_store_is_created_under_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = StorageConfig {
            backend: StorageBackend::File,
            data_dir: dir.path().join("nested"),
        };

        let store = open_pending_store(&config).await.unwrap();

        assert!(store.list().await.unwrap().is_empty());
        assert!(dir.path().join("nested").is_dir());
    }

    #[test]
    fn test_memory_content_store_selected() {
        let config = ContentStoreConfig {
            backend: ContentStoreBackend::Memory,
            ..Default::default()
        };
        assert!(build_content_store(&config).is_ok());
    }
}
