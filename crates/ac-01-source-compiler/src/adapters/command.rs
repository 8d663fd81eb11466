//! # Command Toolchain
//!
//! Runs an external build command (e.g. `npx hardhat compile`) inside the
//! workspace and captures its output.

use crate::domain::config::CompilerConfig;
use crate::errors::CompilerError;
use crate::ports::outbound::{Toolchain, ToolchainOutput};
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

/// Toolchain backed by a child process.
#[derive(Debug, Clone)]
pub struct CommandToolchain {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandToolchain {
    pub fn new(program: impl Into<String>, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args,
            timeout,
        }
    }

    /// Build from the compiler configuration.
    #[must_use]
    pub fn from_config(config: &CompilerConfig) -> Self {
        Self::new(config.program.clone(), config.args.clone(), config.timeout)
    }
}

#[async_trait]
impl Toolchain for CommandToolchain {
    async fn build(&self, workspace: &Path) -> Result<ToolchainOutput, CompilerError> {
        debug!(program = %self.program, args = ?self.args, "Invoking toolchain");

        let child = Command::new(&self.program)
            .args(&self.args)
            .current_dir(workspace)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| CompilerError::ToolchainUnavailable(format!("{}: {e}", self.program)))?;

        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => result?,
            Err(_) => {
                warn!(timeout_secs = self.timeout.as_secs(), "Toolchain run timed out");
                return Err(CompilerError::Timeout {
                    after_secs: self.timeout.as_secs(),
                });
            }
        };

        Ok(ToolchainOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_captures_exit_status_and_output() {
        let dir = tempfile::tempdir().unwrap();
        let ok = CommandToolchain::new(
            "sh",
            vec!["-c".into(), "echo built".into()],
            Duration::from_secs(5),
        );
        let out = ok.build(dir.path()).await.unwrap();
        assert!(out.success);
        assert_eq!(out.stdout.trim(), "built");

        let failing = CommandToolchain::new(
            "sh",
            vec!["-c".into(), "echo 'ParserError: expected' >&2; exit 1".into()],
            Duration::from_secs(5),
        );
        let out = failing.build(dir.path()).await.unwrap();
        assert!(!out.success);
        assert!(out.diagnostics().contains("ParserError"));
    }

    #[tokio::test]
    async fn test_missing_program_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let toolchain =
            CommandToolchain::new("definitely-not-a-real-binary-42", vec![], Duration::from_secs(1));
        let err = toolchain.build(dir.path()).await.unwrap_err();
        assert!(matches!(err, CompilerError::ToolchainUnavailable(_)));
    }

    #[tokio::test]
    async fn test_timeout_kills_run() {
        let dir = tempfile::tempdir().unwrap();
        let toolchain = CommandToolchain::new(
            "sh",
            vec!["-c".into(), "sleep 5".into()],
            Duration::from_millis(100),
        );
        let err = toolchain.build(dir.path()).await.unwrap_err();
        assert!(matches!(err, CompilerError::Timeout { .. }));
    }
}
