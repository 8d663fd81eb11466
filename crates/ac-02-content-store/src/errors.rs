//! # Error Types

use shared_types::ContentId;
use thiserror::Error;

/// Errors from content store operations.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Transport failure or 5xx after retries were exhausted.
    #[error("content store unavailable: {0}")]
    StoreUnavailable(String),

    /// The store is reachable but has no content under this id.
    #[error("content not found: {0}")]
    ContentNotFound(ContentId),

    /// The store refused the request (auth, quota, bad payload).
    #[error("content store rejected request ({status}): {detail}")]
    Rejected { status: u16, detail: String },

    /// The store answered with something we cannot interpret.
    #[error("invalid content store response: {0}")]
    InvalidResponse(String),
}

impl StoreError {
    /// Stable kind name surfaced to API clients.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::StoreUnavailable(_) => "StoreUnavailable",
            Self::ContentNotFound(_) => "ContentNotFound",
            Self::Rejected { .. } => "StoreRejected",
            Self::InvalidResponse(_) => "StoreInvalidResponse",
        }
    }

    /// Whether a retry could succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_))
    }
}
