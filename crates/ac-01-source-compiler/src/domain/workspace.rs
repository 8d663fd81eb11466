//! # Build Workspace
//!
//! Layout of the shared build directory (Hardhat conventions):
//!
//! ```text
//! <root>/
//! ├── contracts/<source_file_name>
//! ├── artifacts/contracts/<source_file_name>/<Name>.json
//! └── cache/
//! ```
//!
//! `contracts/`, `artifacts/` and `cache/` are wiped before every run. The
//! rest of the root (toolchain config, installed packages) is left alone.

use std::path::{Path, PathBuf};
use tracing::debug;

/// Directories owned by a single compile run.
const RUN_DIRS: &[&str] = &["contracts", "artifacts", "cache"];

/// The shared build workspace.
#[derive(Debug, Clone)]
pub struct BuildWorkspace {
    root: PathBuf,
    source_file_name: String,
}

impl BuildWorkspace {
    pub fn new(root: impl Into<PathBuf>, source_file_name: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            source_file_name: source_file_name.into(),
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where the uploaded source is written.
    #[must_use]
    pub fn source_path(&self) -> PathBuf {
        self.root.join("contracts").join(&self.source_file_name)
    }

    /// Where the toolchain is expected to place the artifact for `name`.
    #[must_use]
    pub fn artifact_path(&self, contract_name: &str) -> PathBuf {
        self.root
            .join("artifacts")
            .join("contracts")
            .join(&self.source_file_name)
            .join(format!("{contract_name}.json"))
    }

    /// Remove every per-run directory so no artifact from a previous upload
    /// survives into this one.
    pub async fn reset(&self) -> std::io::Result<()> {
        for dir in RUN_DIRS {
            let path = self.root.join(dir);
            match tokio::fs::remove_dir_all(&path).await {
                Ok(()) => debug!(path = %path.display(), "Cleared workspace directory"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e),
            }
        }
        tokio::fs::create_dir_all(self.root.join("contracts")).await
    }

    /// Write the uploaded source to the canonical path.
    pub async fn write_source(&self, source: &[u8]) -> std::io::Result<PathBuf> {
        let path = self.source_path();
        tokio::fs::write(&path, source).await?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_follow_hardhat_layout() {
        let ws = BuildWorkspace::new("/tmp/build", "Contract.sol");
        assert_eq!(
            ws.source_path(),
            PathBuf::from("/tmp/build/contracts/Contract.sol")
        );
        assert_eq!(
            ws.artifact_path("Foo"),
            PathBuf::from("/tmp/build/artifacts/contracts/Contract.sol/Foo.json")
        );
    }

    #[tokio::test]
    async fn test_reset_removes_previous_run_but_keeps_config() {
        let dir = tempfile::tempdir().unwrap();
        let ws = BuildWorkspace::new(dir.path(), "Contract.sol");
        let stale = ws.artifact_path("Old");
        tokio::fs::create_dir_all(stale.parent().unwrap()).await.unwrap();
        tokio::fs::write(&stale, b"{}").await.unwrap();
        tokio::fs::write(dir.path().join("hardhat.config.cjs"), b"module.exports = {}")
            .await
            .unwrap();

        ws.reset().await.unwrap();

        assert!(!stale.exists());
        assert!(dir.path().join("contracts").is_dir());
        assert!(dir.path().join("hardhat.config.cjs").exists());
    }
}
