//! # Lifecycle Orchestrator

use crate::domain::claims::AddressClaims;
use crate::domain::config::LifecycleConfig;
use crate::domain::pending::PendingTransition;
use crate::errors::LifecycleError;
use crate::ports::inbound::{ArchivedListing, DeployOutcome, LifecycleApi, ListingFailure};
use crate::ports::outbound::{PendingTransitionStore, SourceFetcher};
use crate::service::confirmation::{ConfirmationOutcome, Confirmer};
use ac_01_source_compiler::service::SourceCompiler;
use ac_02_content_store::ContentStore;
use ac_03_chain_registry::errors::ChainError;
use ac_03_chain_registry::ports::inbound::{ContractDeployer, ContractRegistry};
use async_trait::async_trait;
use chrono::Utc;
use futures::stream::{self, StreamExt};
use shared_types::{Address, ContentId, ContractArtifact, ContractRecord, ContractState, TxHash};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info, instrument, warn};

/// Collaborators of the orchestrator.
pub struct LifecycleDependencies {
    pub compiler: Arc<SourceCompiler>,
    pub deployer: Arc<dyn ContractDeployer>,
    pub registry: Arc<dyn ContractRegistry>,
    pub content_store: Arc<dyn ContentStore>,
    pub source_fetcher: Arc<dyn SourceFetcher>,
    pub pending_store: Arc<dyn PendingTransitionStore>,
}

/// What `recover()` did with the persisted records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecoveryReport {
    /// Confirmations scheduled again.
    pub rescheduled: Vec<Address>,
    /// Records dropped because the chain no longer needs them.
    pub discarded: Vec<Address>,
}

/// Drives contracts through `Active -> Pending -> Archived`.
pub struct LifecycleOrchestrator {
    compiler: Arc<SourceCompiler>,
    deployer: Arc<dyn ContractDeployer>,
    registry: Arc<dyn ContractRegistry>,
    content_store: Arc<dyn ContentStore>,
    source_fetcher: Arc<dyn SourceFetcher>,
    pending_store: Arc<dyn PendingTransitionStore>,
    claims: AddressClaims,
    confirmer: Confirmer,
    config: LifecycleConfig,
}

impl LifecycleOrchestrator {
    pub fn new(deps: LifecycleDependencies, config: LifecycleConfig) -> Self {
        let confirmer = Confirmer::new(
            Arc::clone(&deps.registry),
            Arc::clone(&deps.pending_store),
            config.clone(),
        );
        Self {
            compiler: deps.compiler,
            deployer: deps.deployer,
            registry: deps.registry,
            content_store: deps.content_store,
            source_fetcher: deps.source_fetcher,
            pending_store: deps.pending_store,
            claims: AddressClaims::new(),
            confirmer,
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &LifecycleConfig {
        &self.config
    }

    /// Addresses with an archive or registration in flight.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.claims.len()
    }

    /// Archive and hand back the confirmation task.
    ///
    /// Used by callers that need to wait for the Archived write.
    pub async fn archive_tracked(
        &self,
        address: Address,
    ) -> Result<(ContentId, JoinHandle<ConfirmationOutcome>), LifecycleError> {
        let claim = self
            .claims
            .try_claim(address)
            .ok_or_else(|| LifecycleError::InvalidTransition {
                address,
                detail: "another transition for this contract is in progress".into(),
            })?;

        // Unregistered addresses read as the mapping's zero value (Active).
        if !self.registry.get_all_addresses().await?.contains(&address) {
            return Err(LifecycleError::NotRegistered(address));
        }
        let record = self.registry.get_state(address).await?;
        if !record.state.can_transition_to(ContractState::Pending) {
            return Err(LifecycleError::InvalidTransition {
                address,
                detail: format!("contract is {}, expected Active", record.state),
            });
        }

        let metadata = self.source_fetcher.fetch(address).await?;
        let content_id = self.content_store.upload(&metadata).await?;

        let transition = PendingTransition::archive(
            address,
            content_id.clone(),
            Utc::now(),
            self.config.archive_delay,
        );
        self.pending_store.put(&transition).await?;

        if let Err(err) = self
            .registry
            .update_state(address, ContractState::Pending, &content_id)
            .await
        {
            if !self.resolve_failed_pending_write(&transition, &err).await {
                return Err(err.into());
            }
        }

        info!(
            %address,
            %content_id,
            delay = ?self.config.archive_delay,
            "Contract pending archival"
        );
        let handle = self.confirmer.schedule(transition, claim);
        Ok((content_id, handle))
    }

    /// Decide what a failed Pending write left behind.
    ///
    /// A revert means the write did not land. Any other failure is
    /// ambiguous, so the chain is read back: Pending with our content id
    /// means it landed and the confirmation proceeds (`true`); any other
    /// state means it did not and the record is deleted. If the read fails
    /// too, the record stays for `recover()` to reconcile.
    async fn resolve_failed_pending_write(
        &self,
        transition: &PendingTransition,
        err: &ChainError,
    ) -> bool {
        let address = transition.address;
        if !matches!(err, ChainError::TransactionReverted { .. }) {
            match self.registry.get_state(address).await {
                Ok(record)
                    if record.state == ContractState::Pending
                        && record.content_id == transition.content_id =>
                {
                    warn!(%address, error = %err, "Pending write reported failure but landed");
                    return true;
                }
                Ok(record) => {
                    info!(%address, state = %record.state, "Pending write did not land");
                }
                Err(read_err) => {
                    warn!(
                        %address,
                        error = %err,
                        read_error = %read_err,
                        "Pending write outcome unknown, keeping record for recovery"
                    );
                    return false;
                }
            }
        }
        if let Err(store_err) = self.pending_store.remove(address).await {
            error!(%address, error = %store_err, "Could not delete pending record");
        }
        false
    }

    /// Reconcile persisted confirmations with the chain. Call once at startup.
    #[instrument(skip(self))]
    pub async fn recover(&self) -> Result<RecoveryReport, LifecycleError> {
        let mut report = RecoveryReport::default();
        for transition in self.pending_store.list().await? {
            let address = transition.address;
            let Some(claim) = self.claims.try_claim(address) else {
                continue;
            };

            let keep = match self.registry.get_state(address).await {
                Ok(record) if record.state == ContractState::Pending => {
                    if record.content_id == transition.content_id {
                        true
                    } else {
                        warn!(
                            %address,
                            chain = %record.content_id,
                            persisted = %transition.content_id,
                            "Pending content id changed on chain, dropping record"
                        );
                        false
                    }
                }
                Ok(record) => {
                    info!(%address, state = %record.state, "Nothing left to confirm");
                    false
                }
                Err(err) => {
                    warn!(%address, error = %err, "Could not read state, rescheduling anyway");
                    true
                }
            };

            if keep {
                self.confirmer.schedule(transition, claim);
                report.rescheduled.push(address);
            } else {
                self.pending_store.remove(address).await?;
                report.discarded.push(address);
            }
        }
        info!(
            rescheduled = report.rescheduled.len(),
            discarded = report.discarded.len(),
            "Recovered pending transitions"
        );
        Ok(report)
    }
}

#[async_trait]
impl LifecycleApi for LifecycleOrchestrator {
    async fn compile(&self, source: &[u8]) -> Result<ContractArtifact, LifecycleError> {
        Ok(self.compiler.compile(source).await?)
    }

    #[instrument(skip(self, constructor_args))]
    async fn deploy(
        &self,
        contract_name: &str,
        constructor_args: &[serde_json::Value],
    ) -> Result<DeployOutcome, LifecycleError> {
        let artifact = self.compiler.artifact(contract_name)?;
        let deployed = self.deployer.deploy(&artifact, constructor_args).await?;
        let registration_tx = self.register(deployed.address).await?;
        Ok(DeployOutcome {
            address: deployed.address,
            tx_hash: deployed.tx_hash,
            registration_tx,
            gas_used: deployed.gas_used,
        })
    }

    #[instrument(skip(self))]
    async fn register(&self, address: Address) -> Result<TxHash, LifecycleError> {
        // A held claim means another registration or an archive is running.
        let _claim = self
            .claims
            .try_claim(address)
            .ok_or(LifecycleError::AlreadyRegistered(address))?;
        if self.registry.get_all_addresses().await?.contains(&address) {
            return Err(LifecycleError::AlreadyRegistered(address));
        }
        let tx_hash = self.registry.add_contract(address).await?;
        info!(%address, %tx_hash, "Contract registered as Active");
        Ok(tx_hash)
    }

    #[instrument(skip(self))]
    async fn archive(&self, address: Address) -> Result<ContentId, LifecycleError> {
        self.archive_tracked(address)
            .await
            .map(|(content_id, _)| content_id)
    }

    async fn get_state(&self, address: Address) -> Result<ContractRecord, LifecycleError> {
        Ok(self.registry.get_state(address).await?)
    }

    #[instrument(skip(self))]
    async fn list_archived(&self) -> Result<ArchivedListing, LifecycleError> {
        let addresses = self.registry.get_all_addresses().await?;
        let registry = &self.registry;
        let mut results: Vec<_> = stream::iter(addresses.into_iter().enumerate())
            .map(|(index, address)| async move {
                (index, address, registry.get_state(address).await)
            })
            .buffer_unordered(self.config.listing_concurrency.max(1))
            .collect()
            .await;
        results.sort_by_key(|(index, _, _)| *index);

        let mut listing = ArchivedListing::default();
        for (_, address, result) in results {
            match result {
                Ok(record) if record.state == ContractState::Archived => {
                    listing.archived.push(record);
                }
                Ok(_) => {}
                Err(err) => {
                    warn!(%address, error = %err, "State lookup failed while listing");
                    listing.failures.push(ListingFailure {
                        contract_address: address,
                        error: err.kind().to_string(),
                        detail: err.to_string(),
                    });
                }
            }
        }
        Ok(listing)
    }

    #[instrument(skip(self))]
    async fn update_state(
        &self,
        address: Address,
        state: ContractState,
        content_id: &ContentId,
    ) -> Result<TxHash, LifecycleError> {
        warn!(%address, %state, "Direct state write bypasses lifecycle checks");
        Ok(self.registry.update_state(address, state, content_id).await?)
    }

    async fn pending(&self) -> Result<Vec<PendingTransition>, LifecycleError> {
        Ok(self.pending_store.list().await?)
    }
}
