//! # Error Types

use shared_types::{Address, TxHash, UnknownContractState};
use thiserror::Error;

/// Errors from chain, deployment and registry operations.
#[derive(Debug, Clone, Error)]
pub enum ChainError {
    /// RPC transport failure after retries, or no receipt before the deadline.
    #[error("chain unavailable: {0}")]
    ChainUnavailable(String),

    /// The transaction was mined with status 0, or a call reverted.
    #[error("transaction reverted{}", describe_revert(.tx_hash, .reason))]
    TransactionReverted {
        tx_hash: Option<TxHash>,
        reason: Option<String>,
    },

    /// Creation transaction mined but no code lives at the reported address.
    #[error("deployment produced no code at {address} (tx {tx_hash})")]
    EmptyDeployment { address: Address, tx_hash: TxHash },

    /// The registry returned a state discriminant outside the known set.
    ///
    /// Carries the raw decimal value, which may exceed `u8`.
    #[error("registry returned unknown state value {0}")]
    UnknownState(String),

    /// The node rejected the request (nonce, funds, malformed params).
    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// The node answered with something we cannot interpret.
    #[error("invalid chain response: {0}")]
    InvalidResponse(String),

    /// Call data could not be encoded or return data decoded.
    #[error("abi error: {0}")]
    Abi(String),

    /// Signing key is missing or malformed.
    #[error("signer error: {0}")]
    Signer(String),

    /// Endpoint or registry declarations are unusable.
    #[error("invalid chain configuration: {0}")]
    Config(String),
}

impl ChainError {
    /// Stable kind name surfaced to API clients.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ChainUnavailable(_) => "ChainUnavailable",
            Self::TransactionReverted { .. } => "TransactionReverted",
            Self::EmptyDeployment { .. } => "EmptyDeployment",
            Self::UnknownState(_) => "UnknownContractState",
            Self::Rpc { .. } => "ChainRpcError",
            Self::InvalidResponse(_) => "ChainInvalidResponse",
            Self::Abi(_) => "AbiError",
            Self::Signer(_) => "SignerError",
            Self::Config(_) => "ChainConfigError",
        }
    }

    /// Whether a retry could succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::ChainUnavailable(_))
    }
}

fn describe_revert(tx_hash: &Option<TxHash>, reason: &Option<String>) -> String {
    let mut out = String::new();
    if let Some(hash) = tx_hash {
        out.push_str(&format!(" ({hash})"));
    }
    if let Some(reason) = reason {
        out.push_str(&format!(": {reason}"));
    }
    out
}

impl From<UnknownContractState> for ChainError {
    fn from(err: UnknownContractState) -> Self {
        Self::UnknownState(err.0.to_string())
    }
}

impl From<ethers::abi::Error> for ChainError {
    fn from(err: ethers::abi::Error) -> Self {
        Self::Abi(err.to_string())
    }
}
