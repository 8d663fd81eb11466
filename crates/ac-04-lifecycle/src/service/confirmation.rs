//! Deferred Pending -> Archived confirmation.

use crate::domain::claims::ClaimGuard;
use crate::domain::config::LifecycleConfig;
use crate::domain::pending::PendingTransition;
use crate::ports::outbound::PendingTransitionStore;
use ac_03_chain_registry::ports::inbound::ContractRegistry;
use chrono::Utc;
use shared_types::TxHash;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{error, info, warn, Instrument};

/// How a scheduled confirmation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationOutcome {
    /// The target state was written.
    Confirmed(TxHash),
    /// Attempts exhausted; the record stays for startup recovery.
    Deferred,
}

/// Spawns confirmation tasks.
#[derive(Clone)]
pub(crate) struct Confirmer {
    registry: Arc<dyn ContractRegistry>,
    store: Arc<dyn PendingTransitionStore>,
    config: LifecycleConfig,
}

impl Confirmer {
    pub(crate) fn new(
        registry: Arc<dyn ContractRegistry>,
        store: Arc<dyn PendingTransitionStore>,
        config: LifecycleConfig,
    ) -> Self {
        Self {
            registry,
            store,
            config,
        }
    }

    /// Run the confirmation when `transition` is due. The claim is held
    /// until the task ends.
    pub(crate) fn schedule(
        &self,
        transition: PendingTransition,
        claim: ClaimGuard,
    ) -> JoinHandle<ConfirmationOutcome> {
        let deadline = Instant::now() + transition.remaining(Utc::now());
        let span = tracing::info_span!(
            "confirm",
            address = %transition.address,
            content_id = %transition.content_id
        );
        let this = self.clone();
        tokio::spawn(
            async move {
                let _claim = claim;
                tokio::time::sleep_until(deadline).await;
                this.confirm(&transition).await
            }
            .instrument(span),
        )
    }

    async fn confirm(&self, transition: &PendingTransition) -> ConfirmationOutcome {
        let attempts = self.config.max_confirm_attempts.max(1);
        for attempt in 1..=attempts {
            match self
                .registry
                .update_state(
                    transition.address,
                    transition.target_state,
                    &transition.content_id,
                )
                .await
            {
                Ok(tx_hash) => {
                    if let Err(err) = self.store.remove(transition.address).await {
                        // Recovery will find the chain already Archived and drop it.
                        warn!(error = %err, "Confirmed but could not delete pending record");
                    }
                    info!(%tx_hash, state = %transition.target_state, "Transition confirmed");
                    return ConfirmationOutcome::Confirmed(tx_hash);
                }
                Err(err) if attempt < attempts => {
                    warn!(attempt, error = %err, "Confirmation failed, retrying");
                    tokio::time::sleep(self.config.retry_delay).await;
                }
                Err(err) => {
                    error!(attempt, error = %err, "Confirmation failed, left for recovery");
                }
            }
        }
        ConfirmationOutcome::Deferred
    }
}
