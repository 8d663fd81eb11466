//! Shared harness: a full orchestrator over in-memory collaborators.

#![allow(dead_code)]

use ac_01_source_compiler::prelude::*;
use ac_02_content_store::InMemoryContentStore;
use ac_03_chain_registry::prelude::*;
use ac_04_lifecycle::prelude::*;
use async_trait::async_trait;
use serde_json::{json, Value};
use shared_types::{Address, ContentId, ContractRecord, ContractState, TxHash};
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

pub const FOO: &str = "contract Foo { function get() public view returns (uint) { return 1; } }";

/// Writes a Hardhat-shaped artifact for the first contract in the source.
pub struct FakeHardhat;

#[async_trait]
impl Toolchain for FakeHardhat {
    async fn build(&self, workspace: &Path) -> Result<ToolchainOutput, CompilerError> {
        let ws = BuildWorkspace::new(workspace, "Contract.sol");
        let src = tokio::fs::read_to_string(ws.source_path()).await?;
        let name = RegexNameScanner
            .scan(&src)
            .ok_or_else(|| CompilerError::InvalidSource("no contract".into()))?;
        let path = ws.artifact_path(&name);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let body = json!({
            "contractName": name,
            "abi": [{"type": "function", "name": "get", "inputs": [], "outputs": [{"type": "uint256"}]}],
            "bytecode": "0x6080604052",
        });
        tokio::fs::write(&path, body.to_string()).await?;
        Ok(ToolchainOutput {
            success: true,
            ..Default::default()
        })
    }
}

/// Returns a fixed metadata document per address.
#[derive(Default)]
pub struct StaticSourceFetcher {
    pub calls: AtomicUsize,
    pub offline: AtomicBool,
}

#[async_trait]
impl SourceFetcher for StaticSourceFetcher {
    async fn fetch(&self, address: Address) -> Result<Value, SourceFetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.offline.load(Ordering::SeqCst) {
            return Err(SourceFetchError::Unavailable("explorer down".into()));
        }
        Ok(json!({
            "ContractName": "Foo",
            "SourceCode": FOO,
            "Address": address,
        }))
    }
}

pub struct Harness {
    pub orchestrator: Arc<LifecycleOrchestrator>,
    pub chain: Arc<InMemoryChain>,
    pub registry: Arc<InMemoryRegistry>,
    pub content_store: Arc<InMemoryContentStore>,
    pub fetcher: Arc<StaticSourceFetcher>,
    pub pending: Arc<InMemoryPendingStore>,
    _workspace: TempDir,
}

pub fn config() -> LifecycleConfig {
    LifecycleConfig {
        archive_delay: Duration::from_secs(60),
        retry_delay: Duration::from_secs(5),
        max_confirm_attempts: 3,
        listing_concurrency: 4,
    }
}

pub fn harness() -> Harness {
    harness_with(Arc::new(InMemoryRegistry::new()), Arc::new(InMemoryPendingStore::new()))
}

pub fn harness_with(registry: Arc<InMemoryRegistry>, pending: Arc<InMemoryPendingStore>) -> Harness {
    harness_over(registry.clone(), registry, pending)
}

/// Orchestrator talking to `port`; `registry` is the store behind it that
/// tests inspect.
pub fn harness_over(
    port: Arc<dyn ContractRegistry>,
    registry: Arc<InMemoryRegistry>,
    pending: Arc<InMemoryPendingStore>,
) -> Harness {
    let workspace = tempfile::tempdir().unwrap();
    let compiler_config = CompilerConfig {
        workspace_dir: workspace.path().to_path_buf(),
        ..Default::default()
    };
    let compiler = Arc::new(SourceCompiler::new(&compiler_config, Arc::new(FakeHardhat)));
    let chain = Arc::new(InMemoryChain::new());
    let content_store = Arc::new(InMemoryContentStore::new());
    let fetcher = Arc::new(StaticSourceFetcher::default());

    let orchestrator = LifecycleOrchestrator::new(
        LifecycleDependencies {
            compiler,
            deployer: Arc::new(Deployer::new(chain.clone())),
            registry: port,
            content_store: content_store.clone(),
            source_fetcher: fetcher.clone(),
            pending_store: pending.clone(),
        },
        config(),
    );

    Harness {
        orchestrator: Arc::new(orchestrator),
        chain,
        registry,
        content_store,
        fetcher,
        pending,
        _workspace: workspace,
    }
}

/// Delegates to an `InMemoryRegistry`, yielding to the scheduler before
/// every call so concurrent operations interleave at each await.
pub struct YieldingRegistry(pub Arc<InMemoryRegistry>);

#[async_trait]
impl ContractRegistry for YieldingRegistry {
    async fn add_contract(&self, address: Address) -> Result<TxHash, ChainError> {
        tokio::task::yield_now().await;
        self.0.add_contract(address).await
    }

    async fn update_state(
        &self,
        address: Address,
        state: ContractState,
        content_id: &ContentId,
    ) -> Result<TxHash, ChainError> {
        tokio::task::yield_now().await;
        self.0.update_state(address, state, content_id).await
    }

    async fn get_state(&self, address: Address) -> Result<ContractRecord, ChainError> {
        tokio::task::yield_now().await;
        self.0.get_state(address).await
    }

    async fn get_all_addresses(&self) -> Result<Vec<Address>, ChainError> {
        tokio::task::yield_now().await;
        self.0.get_all_addresses().await
    }
}

/// Takes the registry offline as soon as an `update_state` call fails, so
/// every read after the failed write fails too.
pub struct OfflineAfterFailedWrite(pub Arc<InMemoryRegistry>);

#[async_trait]
impl ContractRegistry for OfflineAfterFailedWrite {
    async fn add_contract(&self, address: Address) -> Result<TxHash, ChainError> {
        self.0.add_contract(address).await
    }

    async fn update_state(
        &self,
        address: Address,
        state: ContractState,
        content_id: &ContentId,
    ) -> Result<TxHash, ChainError> {
        let result = self.0.update_state(address, state, content_id).await;
        if result.is_err() {
            self.0.set_offline(true);
        }
        result
    }

    async fn get_state(&self, address: Address) -> Result<ContractRecord, ChainError> {
        self.0.get_state(address).await
    }

    async fn get_all_addresses(&self) -> Result<Vec<Address>, ChainError> {
        self.0.get_all_addresses().await
    }
}
