//! # AC-03 Chain Registry - Chain Client, Deployer and Registry Gateway
//!
//! **Component ID:** 3
//!
//! ## Purpose
//!
//! Everything that talks to the EVM chain:
//!
//! - `JsonRpcChainClient` is an `ethers` provider stack (HTTP provider,
//!   `LocalWallet` signer, nonce manager) against the configured node.
//! - `Deployer` submits contract creations and refuses to report success
//!   for an address without code.
//! - `RegistryGateway` encodes calls against the registry contract whose
//!   address and human-readable function declarations are injected
//!   through `RegistryConfig`.
//! - `BlockscoutExplorer` reads verified source metadata and transaction
//!   history from the block explorer.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement Location |
//! |----|-----------|---------------------|
//! | INVARIANT-1 | Deployment only succeeds if the address has code | `service/deployer.rs` |
//! | INVARIANT-2 | Unknown on-chain state values are errors, never coerced | `service/registry.rs` - `get_state()` |
//! | INVARIANT-3 | A mined receipt with status 0 is `TransactionReverted` | `ports/outbound.rs` - `transact()` |
//! | INVARIANT-4 | One signer never races itself for a nonce | `adapters/rpc.rs` - `NonceManagerMiddleware` |
//!
//! ## Outbound Dependencies
//!
//! | Dependency | Trait | Purpose |
//! |------------|-------|---------|
//! | EVM node | `ChainClient` | Reads, calls and signed transactions |
//!
//! ## Inbound Ports
//!
//! | Trait | Implementations |
//! |-------|-----------------|
//! | `ContractRegistry` | `RegistryGateway`, `InMemoryRegistry` |
//! | `ContractDeployer` | `Deployer` |

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

// =============================================================================
// MODULES
// =============================================================================

pub mod adapters;
pub mod domain;
pub mod errors;
pub mod ports;
pub mod service;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::adapters::explorer::{BlockscoutExplorer, ExplorerError, ExplorerTransaction};
    pub use crate::adapters::memory::{InMemoryChain, InMemoryRegistry};
    pub use crate::adapters::rpc::JsonRpcChainClient;
    pub use crate::domain::config::{ChainConfig, ExplorerConfig, RegistryConfig, RegistryFunctions};
    pub use crate::domain::transaction::{TxReceipt, TxRequest};
    pub use crate::errors::ChainError;
    pub use crate::ports::inbound::{ContractDeployer, ContractRegistry, DeployedContract};
    pub use crate::ports::outbound::ChainClient;
    pub use crate::service::{Deployer, RegistryGateway};
}

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Component ID.
pub const COMPONENT_ID: u8 = 3;
