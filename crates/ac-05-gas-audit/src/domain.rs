//! # Audit Results

use serde::Serialize;
use shared_types::{Address, ContentId, ContractState};

/// Gas consumed by one contract's transaction history at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageSample {
    pub contract_address: Address,
    pub transaction_count: usize,
    pub total_gas_used: u64,
    /// Registry state when the sample was taken, if it could be read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<ContractState>,
}

impl UsageSample {
    /// Sum a list of per-transaction gas figures.
    #[must_use]
    pub fn from_history(
        contract_address: Address,
        gas_used: &[u64],
        state: Option<ContractState>,
    ) -> Self {
        Self {
            contract_address,
            transaction_count: gas_used.len(),
            total_gas_used: saturating_total(gas_used.iter().copied()),
            state,
        }
    }
}

fn saturating_total(values: impl Iterator<Item = u64>) -> u64 {
    values.fold(0u64, u64::saturating_add)
}

/// Where in the per-address sequence a failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AuditPhase {
    Before,
    Archive,
    After,
}

/// A step that failed for one address. The batch carries on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditFailure {
    pub contract_address: Address,
    pub phase: AuditPhase,
    pub error: String,
    pub detail: String,
}

/// Archive outcome for one address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveRecord {
    pub contract_address: Address,
    pub content_id: ContentId,
}

/// Result of `compare_usage`.
///
/// `results_before` and `results_after` are in input order but may differ
/// in length when a measurement failed. Addresses whose archive failed are
/// still measured afterwards; their `state` shows where they were left.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GasComparison {
    pub results_before: Vec<UsageSample>,
    pub results_after: Vec<UsageSample>,
    pub archived: Vec<ArchiveRecord>,
    pub failures: Vec<AuditFailure>,
}

impl GasComparison {
    /// Sum of `total_gas_used` across the before samples.
    #[must_use]
    pub fn total_before(&self) -> u64 {
        saturating_total(self.results_before.iter().map(|s| s.total_gas_used))
    }

    /// Sum of `total_gas_used` across the after samples.
    #[must_use]
    pub fn total_after(&self) -> u64 {
        saturating_total(self.results_after.iter().map(|s| s.total_gas_used))
    }
}
