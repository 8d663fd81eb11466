//! # Error Types
//!
//! Failures of the compile pipeline. Each variant maps to a distinct kind so
//! callers can tell a bad upload from a toolchain/path mismatch.

use thiserror::Error;

/// Errors that can occur while compiling a source file.
#[derive(Debug, Clone, Error)]
pub enum CompilerError {
    /// No `contract <Name> {` declaration could be found.
    #[error("invalid source: {0}")]
    InvalidSource(String),

    /// The toolchain exited non-zero.
    #[error("compilation failed: {diagnostics}")]
    CompilationFailed { diagnostics: String },

    /// The toolchain reported success but the artifact is not where expected.
    #[error("artifact missing: {0}")]
    ArtifactMissing(String),

    /// The artifact file exists but cannot be decoded.
    #[error("artifact malformed: {0}")]
    ArtifactMalformed(String),

    /// The toolchain could not be started.
    #[error("toolchain unavailable: {0}")]
    ToolchainUnavailable(String),

    /// The toolchain ran longer than the configured limit.
    #[error("toolchain timed out after {after_secs}s")]
    Timeout { after_secs: u64 },

    /// Workspace filesystem operation failed.
    #[error("workspace error: {0}")]
    Workspace(String),
}

impl CompilerError {
    /// Stable kind name surfaced to API clients.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidSource(_) => "InvalidSource",
            Self::CompilationFailed { .. } => "CompilationFailed",
            Self::ArtifactMissing(_) => "ArtifactMissing",
            Self::ArtifactMalformed(_) => "ArtifactMalformed",
            Self::ToolchainUnavailable(_) => "ToolchainUnavailable",
            Self::Timeout { .. } => "CompilationTimeout",
            Self::Workspace(_) => "WorkspaceError",
        }
    }
}

impl From<std::io::Error> for CompilerError {
    fn from(err: std::io::Error) -> Self {
        Self::Workspace(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds_are_distinct() {
        let missing = CompilerError::ArtifactMissing("x".into());
        let failed = CompilerError::CompilationFailed {
            diagnostics: "ParserError".into(),
        };
        assert_eq!(missing.kind(), "ArtifactMissing");
        assert_eq!(failed.kind(), "CompilationFailed");
        assert!(failed.to_string().contains("ParserError"));
    }
}
