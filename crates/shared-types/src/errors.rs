//! # Error Types
//!
//! Parse errors for the shared domain types.

use thiserror::Error;

/// Errors raised while parsing shared types from their wire form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Input is not valid hex.
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// Decoded byte length does not match the type.
    #[error("invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// State name or number is not one of Active, Pending, Archived.
    #[error("unknown contract state: {0}")]
    UnknownState(String),
}

/// An on-chain state discriminant outside `{0, 1, 2}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown on-chain contract state value: {0}")]
pub struct UnknownContractState(pub u8);
