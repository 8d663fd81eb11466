//! # Driven Ports (SPI - Outbound)
//!
//! The external toolchain that turns the workspace into artifacts.

use crate::errors::CompilerError;
use async_trait::async_trait;
use std::path::Path;

/// Captured result of one toolchain run.
#[derive(Debug, Clone, Default)]
pub struct ToolchainOutput {
    /// Whether the toolchain exited with status zero.
    pub success: bool,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
}

impl ToolchainOutput {
    /// Diagnostic text for a failed run: stderr, or stdout when stderr is empty.
    #[must_use]
    pub fn diagnostics(&self) -> String {
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            self.stdout.trim().to_string()
        } else {
            stderr.to_string()
        }
    }
}

/// Interface to the external compiler toolchain.
///
/// ## Implementation Notes
///
/// Implementations run synchronously from the caller's point of view and
/// must only touch files under `workspace`. They are never invoked
/// concurrently by `SourceCompiler`.
#[async_trait]
pub trait Toolchain: Send + Sync {
    /// Build every source under `workspace`.
    ///
    /// Returns `Err` only when the toolchain could not run at all; a run that
    /// exits non-zero is reported through `ToolchainOutput::success`.
    async fn build(&self, workspace: &Path) -> Result<ToolchainOutput, CompilerError>;
}
