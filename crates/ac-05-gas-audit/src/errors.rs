//! Gas audit errors.

use shared_types::Address;
use thiserror::Error;

/// Failures of the audit itself or of one of its collaborators.
///
/// Collaborator failures are recorded per address in the comparison; only
/// batch validation errors fail `compare_usage` as a whole.
#[derive(Debug, Clone, Error)]
pub enum AuditError {
    #[error("no contract addresses given")]
    EmptyBatch,

    #[error("batch of {actual} addresses exceeds the limit of {max}")]
    BatchTooLarge { max: usize, actual: usize },

    /// Transaction history could not be read.
    #[error("transaction history unavailable for {address}: {detail}")]
    HistoryUnavailable { address: Address, detail: String },

    /// Archive or state read failed. `kind` is the lifecycle error kind.
    #[error("{kind}: {detail}")]
    Lifecycle { kind: String, detail: String },
}

impl AuditError {
    #[must_use]
    pub fn kind(&self) -> &str {
        match self {
            Self::EmptyBatch => "EmptyBatch",
            Self::BatchTooLarge { .. } => "BatchTooLarge",
            Self::HistoryUnavailable { .. } => "HistoryUnavailable",
            Self::Lifecycle { kind, .. } => kind,
        }
    }

    /// Input problems the caller can fix.
    #[must_use]
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::EmptyBatch | Self::BatchTooLarge { .. })
    }
}
