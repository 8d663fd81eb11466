//! # AC-05 Gas Audit - Archival Cost Comparison
//!
//! **Component ID:** 5
//!
//! ## Purpose
//!
//! Measures the gas spent on each contract's transaction history, drives the
//! contract through archive, and measures again. Used to compare costs before
//! and after archival. Read-only apart from the archive it triggers.
//!
//! ## Guarantees
//!
//! | Guarantee | Enforcement Location |
//! |-----------|---------------------|
//! | One address failing never aborts the batch | `service.rs` - `audit_one()` |
//! | The after sample is taken even when archive failed | `service.rs` - `audit_one()` |
//! | Each address is archived at most once per call | `service.rs` - `compare_usage()` |
//!
//! ## Ports
//!
//! | Port | Default adapter |
//! |------|-----------------|
//! | `TransactionHistory` | `ExplorerHistory` (Blockscout) |
//! | `ArchiveDriver` | `LifecycleArchiveDriver` (ac-04) |

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod adapters;
pub mod config;
pub mod domain;
pub mod errors;
pub mod ports;
pub mod service;

pub use adapters::{ExplorerHistory, LifecycleArchiveDriver};
pub use config::AuditConfig;
pub use domain::{ArchiveRecord, AuditFailure, AuditPhase, GasComparison, UsageSample};
pub use errors::AuditError;
pub use ports::{ArchiveDriver, TransactionHistory};
pub use service::GasAudit;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Component ID.
pub const COMPONENT_ID: u8 = 5;
