//! # Shared Types Crate
//!
//! Domain entities shared by every crate of the lifecycle pipeline.
//!
//! ## Design Principles
//!
//! - **Chain is authoritative**: `ContractState` mirrors the registry
//!   contract's `uint8` enum and the mapping is exhaustive. An unknown
//!   on-chain value is an error, never a default.
//! - **Opaque content references**: `ContentId` is carried around as-is and
//!   never parsed.
//! - **Hex on the wire**: `Address` and `TxHash` serialize as `0x`-prefixed
//!   lowercase hex strings.

pub mod entities;
pub mod errors;
pub mod retry;

pub use entities::*;
pub use errors::*;
pub use retry::{retry_with_backoff, RetryPolicy};
