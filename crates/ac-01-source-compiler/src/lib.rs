//! # AC-01 Source Compiler - Single-Slot Build Workspace
//!
//! **Component ID:** 1
//!
//! ## Purpose
//!
//! Turns one uploaded Solidity file into a `ContractArtifact` (name, ABI,
//! bytecode) by driving an external toolchain inside a shared build
//! workspace.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement Location |
//! |----|-----------|---------------------|
//! | INVARIANT-1 | No toolchain run without an extractable contract name | `service.rs` - `compile()` |
//! | INVARIANT-2 | Workspace reset before every run | `domain/workspace.rs` - `reset()` |
//! | INVARIANT-3 | At most one compile in flight | `service.rs` - workspace `Mutex` |
//! | INVARIANT-4 | Success without artifact is `ArtifactMissing`, not success | `service.rs` - `read_artifact()` |
//!
//! ## Outbound Dependencies
//!
//! | Dependency | Trait | Purpose |
//! |------------|-------|---------|
//! | External toolchain | `Toolchain` | Build the workspace (Hardhat by default) |
//!
//! ## Usage Example
//!
//! ```ignore
//! use ac_01_source_compiler::prelude::*;
//!
//! let compiler = SourceCompiler::new(CompilerConfig::default(), Arc::new(toolchain));
//! let artifact = compiler.compile(source.as_bytes()).await?;
//! assert_eq!(artifact.name, "Foo");
//! ```

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
    pub use crate::adapters::CommandToolchain;
    pub use crate::domain::config::CompilerConfig;
    pub use crate::domain::scanner::{ContractNameScanner, RegexNameScanner};
    pub use crate::domain::workspace::BuildWorkspace;
    pub use crate::errors::CompilerError;
    pub use crate::ports::outbound::{Toolchain, ToolchainOutput};
    pub use crate::service::SourceCompiler;
}

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Component ID.
pub const COMPONENT_ID: u8 = 1;
