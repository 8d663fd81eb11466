//! # AC-04 Lifecycle Orchestrator - Contract State Machine
//!
//! **Component ID:** 4
//!
//! ## Purpose
//!
//! Drives a contract through `compile -> deploy -> register -> archive ->
//! confirm`, coordinating the source compiler, the chain registry and the
//! content store. The on-chain registry stays the source of truth; this
//! component only tracks in-flight work.
//!
//! ## State Machine
//!
//! ```text
//!   register        archive (Pending write)       confirm (after delay)
//! ----------> Active ----------------------> Pending -----------------> Archived
//! ```
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement Location |
//! |----|-----------|---------------------|
//! | INVARIANT-1 | States only move forward | `service/orchestrator.rs` - `archive()` |
//! | INVARIANT-2 | At most one archive in flight per address | `domain/claims.rs` - `AddressClaims` |
//! | INVARIANT-3 | A pending confirmation is persisted before the Pending write | `service/orchestrator.rs` - `archive()` |
//! | INVARIANT-4 | Persisted confirmations are replayed on startup | `service/orchestrator.rs` - `recover()` |
//! | INVARIANT-5 | No address is registered twice | `service/orchestrator.rs` - `register()` |
//!
//! ## Outbound Dependencies
//!
//! | Dependency | Trait | Purpose |
//! |------------|-------|---------|
//! | Source compiler | `SourceCompiler` (ac-01) | Build artifacts |
//! | Chain | `ContractDeployer`, `ContractRegistry` (ac-03) | Deploy, state reads and writes |
//! | Content store | `ContentStore` (ac-02) | Archive blobs |
//! | Explorer | `SourceFetcher` | Metadata to archive |
//! | Local disk | `PendingTransitionStore` | Durable deferred confirmations |

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
    pub use crate::adapters::{FilePendingStore, InMemoryPendingStore};
    #[cfg(feature = "rocksdb")]
    pub use crate::adapters::RocksDbPendingStore;
    pub use crate::domain::claims::{AddressClaims, ClaimGuard};
    pub use crate::domain::config::LifecycleConfig;
    pub use crate::domain::pending::PendingTransition;
    pub use crate::errors::{LifecycleError, PersistenceError, SourceFetchError};
    pub use crate::ports::inbound::{ArchivedListing, DeployOutcome, LifecycleApi, ListingFailure};
    pub use crate::ports::outbound::{PendingTransitionStore, SourceFetcher};
    pub use crate::service::{
        ConfirmationOutcome, LifecycleDependencies, LifecycleOrchestrator, RecoveryReport,
    };
}

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Component ID.
pub const COMPONENT_ID: u8 = 4;
