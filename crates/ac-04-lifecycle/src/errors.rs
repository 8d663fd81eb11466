//! # Error Types

use ac_01_source_compiler::errors::CompilerError;
use ac_02_content_store::StoreError;
use ac_03_chain_registry::errors::ChainError;
use shared_types::Address;
use thiserror::Error;

/// Failures of the durable pending-transition store.
#[derive(Debug, Clone, Error)]
pub enum PersistenceError {
    #[error("pending store I/O failed: {0}")]
    Io(String),

    #[error("pending store is corrupt: {0}")]
    Corrupt(String),

    #[error("pending store backend error: {0}")]
    Backend(String),
}

impl From<std::io::Error> for PersistenceError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Failures of the source metadata lookup.
#[derive(Debug, Clone, Error)]
pub enum SourceFetchError {
    #[error("source metadata unavailable: {0}")]
    Unavailable(String),

    #[error("no source metadata for {0}")]
    NotFound(Address),
}

/// Errors from lifecycle operations.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// The requested transition is not legal from the contract's current
    /// state, or another transition for the address is in flight.
    #[error("invalid transition for {address}: {detail}")]
    InvalidTransition { address: Address, detail: String },

    #[error("contract {0} is already registered")]
    AlreadyRegistered(Address),

    /// The registry has no entry for the address.
    #[error("contract {0} is not registered")]
    NotRegistered(Address),

    #[error(transparent)]
    Compiler(#[from] CompilerError),

    #[error(transparent)]
    Chain(#[from] ChainError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Source(#[from] SourceFetchError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

impl LifecycleError {
    /// Stable kind name surfaced to API clients.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidTransition { .. } => "InvalidTransition",
            Self::AlreadyRegistered(_) => "AlreadyRegistered",
            Self::NotRegistered(_) => "NotRegistered",
            Self::Compiler(e) => e.kind(),
            Self::Chain(e) => e.kind(),
            Self::Store(e) => e.kind(),
            Self::Source(SourceFetchError::Unavailable(_)) => "ExplorerUnavailable",
            Self::Source(SourceFetchError::NotFound(_)) => "SourceNotFound",
            Self::Persistence(_) => "PersistenceError",
        }
    }
}
