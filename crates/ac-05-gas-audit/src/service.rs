//! # Gas Audit Service
//!
//! For each address, in input order:
//!
//! 1. measure the transaction history (before)
//! 2. drive the contract through archive
//! 3. measure again (after), even when step 2 failed
//!
//! The batch is not transactional. A failed archive leaves that contract
//! wherever the lifecycle stopped (usually Active, sometimes Pending) and
//! the after sample reports that state.

use crate::config::AuditConfig;
use crate::domain::{ArchiveRecord, AuditFailure, AuditPhase, GasComparison, UsageSample};
use crate::errors::AuditError;
use crate::ports::{ArchiveDriver, TransactionHistory};
use shared_types::Address;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, instrument, warn};

pub struct GasAudit {
    history: Arc<dyn TransactionHistory>,
    driver: Arc<dyn ArchiveDriver>,
    config: AuditConfig,
}

impl GasAudit {
    pub fn new(
        history: Arc<dyn TransactionHistory>,
        driver: Arc<dyn ArchiveDriver>,
        config: AuditConfig,
    ) -> Self {
        Self {
            history,
            driver,
            config,
        }
    }

    /// Measure, archive and measure again every address in `addresses`.
    ///
    /// Duplicates are dropped, keeping the first occurrence. Per-address
    /// failures are collected in `failures` and never abort the batch.
    #[instrument(skip(self, addresses), fields(count = addresses.len()))]
    pub async fn compare_usage(&self, addresses: &[Address]) -> Result<GasComparison, AuditError> {
        if addresses.is_empty() {
            return Err(AuditError::EmptyBatch);
        }
        let mut seen = HashSet::new();
        let batch: Vec<Address> = addresses
            .iter()
            .copied()
            .filter(|address| seen.insert(*address))
            .collect();
        if batch.len() > self.config.max_batch_size {
            return Err(AuditError::BatchTooLarge {
                max: self.config.max_batch_size,
                actual: batch.len(),
            });
        }

        let mut comparison = GasComparison::default();
        for address in batch {
            self.audit_one(address, &mut comparison).await;
        }

        info!(
            before = comparison.total_before(),
            after = comparison.total_after(),
            archived = comparison.archived.len(),
            failures = comparison.failures.len(),
            "Gas comparison finished"
        );
        Ok(comparison)
    }

    async fn audit_one(&self, address: Address, comparison: &mut GasComparison) {
        match self.measure(address).await {
            Ok(sample) => comparison.results_before.push(sample),
            Err(err) => comparison.failures.push(failure(address, AuditPhase::Before, &err)),
        }

        match self.driver.archive(address).await {
            Ok(content_id) => comparison.archived.push(ArchiveRecord {
                contract_address: address,
                content_id,
            }),
            Err(err) => {
                warn!(%address, error = %err, "Archive failed during audit");
                comparison.failures.push(failure(address, AuditPhase::Archive, &err));
            }
        }

        match self.measure(address).await {
            Ok(sample) => comparison.results_after.push(sample),
            Err(err) => comparison.failures.push(failure(address, AuditPhase::After, &err)),
        }
    }

    async fn measure(&self, address: Address) -> Result<UsageSample, AuditError> {
        let gas_used = self.history.gas_used(address).await?;
        // A missing state does not invalidate the gas figures.
        let state = match self.driver.state(address).await {
            Ok(state) => Some(state),
            Err(err) => {
                warn!(%address, error = %err, "State unavailable for sample");
                None
            }
        };
        Ok(UsageSample::from_history(address, &gas_used, state))
    }
}

fn failure(address: Address, phase: AuditPhase, err: &AuditError) -> AuditFailure {
    AuditFailure {
        contract_address: address,
        phase,
        error: err.kind().to_string(),
        detail: err.to_string(),
    }
}
