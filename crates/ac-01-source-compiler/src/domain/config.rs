//! Compiler configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Source compiler configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Root of the build workspace (a Hardhat project by default).
    pub workspace_dir: PathBuf,
    /// Canonical file name every upload is written to.
    pub source_file_name: String,
    /// Toolchain executable.
    pub program: String,
    /// Toolchain arguments.
    pub args: Vec<String>,
    /// Hard limit on a single toolchain run.
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            workspace_dir: PathBuf::from("./build"),
            source_file_name: "Contract.sol".to_string(),
            program: "npx".to_string(),
            args: vec!["hardhat".to_string(), "compile".to_string()],
            timeout: Duration::from_secs(120),
        }
    }
}
