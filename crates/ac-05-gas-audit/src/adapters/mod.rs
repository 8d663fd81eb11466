//! # Adapters
//!
//! | Adapter | Port | Backend |
//! |---------|------|---------|
//! | `ExplorerHistory` | `TransactionHistory` | Blockscout `txlist` |
//! | `LifecycleArchiveDriver` | `ArchiveDriver` | Lifecycle orchestrator |

pub mod explorer;
pub mod lifecycle;

pub use explorer::ExplorerHistory;
pub use lifecycle::LifecycleArchiveDriver;
