//! # Source Compiler Service
//!
//! Drives one compile at a time through the shared workspace:
//!
//! 1. Scan the contract name (no toolchain run if absent)
//! 2. Acquire the workspace (queue depth 1)
//! 3. Reset the workspace and write the canonical source file
//! 4. Run the toolchain
//! 5. Read back the artifact and publish it into the build slot

use crate::domain::config::CompilerConfig;
use crate::domain::scanner::{ContractNameScanner, RegexNameScanner};
use crate::domain::workspace::BuildWorkspace;
use crate::errors::CompilerError;
use crate::ports::outbound::Toolchain;
use parking_lot::RwLock;
use serde::Deserialize;
use shared_types::{decode_hex, ContractArtifact};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

/// The subset of a Hardhat artifact file the pipeline reads.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ArtifactFile {
    #[serde(default)]
    contract_name: Option<String>,
    abi: serde_json::Value,
    bytecode: String,
}

/// Compiles uploaded sources inside a single-slot build workspace.
pub struct SourceCompiler {
    workspace: BuildWorkspace,
    toolchain: Arc<dyn Toolchain>,
    scanner: Box<dyn ContractNameScanner>,
    /// Exclusive access to the workspace directory.
    build_lock: Mutex<()>,
    /// Artifact of the last successful compile.
    slot: RwLock<Option<ContractArtifact>>,
}

impl SourceCompiler {
    /// Create a compiler using the default regex name scanner.
    pub fn new(config: &CompilerConfig, toolchain: Arc<dyn Toolchain>) -> Self {
        Self {
            workspace: BuildWorkspace::new(&config.workspace_dir, &config.source_file_name),
            toolchain,
            scanner: Box::new(RegexNameScanner),
            build_lock: Mutex::new(()),
            slot: RwLock::new(None),
        }
    }

    /// Replace the contract name scanner.
    #[must_use]
    pub fn with_scanner(mut self, scanner: Box<dyn ContractNameScanner>) -> Self {
        self.scanner = scanner;
        self
    }

    #[must_use]
    pub fn workspace(&self) -> &BuildWorkspace {
        &self.workspace
    }

    /// Compile one source file.
    ///
    /// Concurrent calls queue on the workspace lock; they never run in
    /// parallel.
    #[instrument(skip(self, source), fields(source_len = source.len()))]
    pub async fn compile(&self, source: &[u8]) -> Result<ContractArtifact, CompilerError> {
        let text = std::str::from_utf8(source)
            .map_err(|_| CompilerError::InvalidSource("source is not valid UTF-8".into()))?;
        let name = self.scanner.scan(text).ok_or_else(|| {
            CompilerError::InvalidSource("no `contract <Name> {` declaration found".into())
        })?;

        let _guard = self.build_lock.lock().await;
        info!(contract = %name, "Compiling contract");

        // The slot describes the workspace contents, which are about to go away.
        self.slot.write().take();

        self.workspace.reset().await?;
        self.workspace.write_source(source).await?;

        let output = self.toolchain.build(self.workspace.root()).await?;
        if !output.success {
            let diagnostics = output.diagnostics();
            warn!(contract = %name, "Toolchain reported compilation failure");
            return Err(CompilerError::CompilationFailed { diagnostics });
        }

        let artifact = self.read_artifact(&name).await?;
        info!(
            contract = %artifact.name,
            bytecode_len = artifact.bytecode.len(),
            "Compilation succeeded"
        );
        *self.slot.write() = Some(artifact.clone());
        Ok(artifact)
    }

    /// The artifact in the build slot, if it was compiled under `name`.
    pub fn artifact(&self, name: &str) -> Result<ContractArtifact, CompilerError> {
        match self.slot.read().as_ref() {
            Some(artifact) if artifact.name == name => Ok(artifact.clone()),
            Some(artifact) => Err(CompilerError::ArtifactMissing(format!(
                "requested {name}, build slot holds {}",
                artifact.name
            ))),
            None => Err(CompilerError::ArtifactMissing(format!(
                "no compiled artifact for {name}"
            ))),
        }
    }

    async fn read_artifact(&self, name: &str) -> Result<ContractArtifact, CompilerError> {
        let path = self.workspace.artifact_path(name);
        let raw = match tokio::fs::read(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(CompilerError::ArtifactMissing(path.display().to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        let file: ArtifactFile = serde_json::from_slice(&raw)
            .map_err(|e| CompilerError::ArtifactMalformed(format!("{}: {e}", path.display())))?;
        let bytecode = decode_hex(&file.bytecode)
            .map_err(|e| CompilerError::ArtifactMalformed(format!("bytecode: {e}")))?;

        Ok(ContractArtifact {
            name: file.contract_name.unwrap_or_else(|| name.to_string()),
            abi: file.abi,
            bytecode,
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::outbound::ToolchainOutput;
    use async_trait::async_trait;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Emulates Hardhat: writes an artifact for every `contract X {` it finds.
    #[derive(Default)]
    struct FakeHardhat {
        runs: AtomicUsize,
        active: AtomicUsize,
        max_active: AtomicUsize,
        write_artifact: bool,
        fail_with: Option<String>,
        delay: Option<Duration>,
    }

    impl FakeHardhat {
        fn working() -> Self {
            Self {
                write_artifact: true,
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl Toolchain for FakeHardhat {
        async fn build(&self, workspace: &Path) -> Result<ToolchainOutput, CompilerError> {
            self.runs.fetch_add(1, Ordering::SeqCst);
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_active.fetch_max(now, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }

            let result = if let Some(msg) = &self.fail_with {
                Ok(ToolchainOutput {
                    success: false,
                    stdout: String::new(),
                    stderr: msg.clone(),
                })
            } else {
                if self.write_artifact {
                    let ws = BuildWorkspace::new(workspace, "Contract.sol");
                    let src = tokio::fs::read_to_string(ws.source_path()).await?;
                    let name = RegexNameScanner.scan(&src).unwrap();
                    let path = ws.artifact_path(&name);
                    tokio::fs::create_dir_all(path.parent().unwrap()).await?;
                    let body = serde_json::json!({
                        "contractName": name,
                        "abi": [{"type": "function", "name": "get", "inputs": [], "outputs": []}],
                        "bytecode": "0x6080604052",
                    });
                    tokio::fs::write(&path, body.to_string()).await?;
                }
                Ok(ToolchainOutput {
                    success: true,
                    ..Default::default()
                })
            };

            self.active.fetch_sub(1, Ordering::SeqCst);
            result
        }
    }

    fn compiler_in(dir: &Path, toolchain: Arc<FakeHardhat>) -> SourceCompiler {
        let config = CompilerConfig {
            workspace_dir: dir.to_path_buf(),
            ..Default::default()
        };
        SourceCompiler::new(&config, toolchain)
    }

    const FOO: &str =
        "contract Foo { function get() public view returns (uint) { return 1; } }";

    #[tokio::test]
    async fn test_compile_extracts_name_and_reads_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let toolchain = Arc::new(FakeHardhat::working());
        let compiler = compiler_in(dir.path(), toolchain.clone());

        let artifact = compiler.compile(FOO.as_bytes()).await.unwrap();

        assert_eq!(artifact.name, "Foo");
        assert_eq!(artifact.bytecode, vec![0x60, 0x80, 0x60, 0x40, 0x52]);
        assert!(artifact.abi.is_array());
        assert_eq!(compiler.artifact("Foo").unwrap(), artifact);
        assert_eq!(toolchain.runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalid_source_never_invokes_toolchain() {
        let dir = tempfile::tempdir().unwrap();
        let toolchain = Arc::new(FakeHardhat::working());
        let compiler = compiler_in(dir.path(), toolchain.clone());

        let err = compiler
            .compile(b"pragma solidity ^0.8.0; library L {}")
            .await
            .unwrap_err();

        assert!(matches!(err, CompilerError::InvalidSource(_)));
        assert_eq!(toolchain.runs.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_toolchain_failure_carries_diagnostics() {
        let dir = tempfile::tempdir().unwrap();
        let toolchain = Arc::new(FakeHardhat {
            fail_with: Some("ParserError: Expected ';' but got '}'".into()),
            ..Default::default()
        });
        let compiler = compiler_in(dir.path(), toolchain);

        match compiler.compile(FOO.as_bytes()).await {
            Err(CompilerError::CompilationFailed { diagnostics }) => {
                assert!(diagnostics.contains("ParserError"));
            }
            other => panic!("expected CompilationFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_success_without_artifact_is_artifact_missing() {
        let dir = tempfile::tempdir().unwrap();
        let compiler = compiler_in(dir.path(), Arc::new(FakeHardhat::default()));

        let err = compiler.compile(FOO.as_bytes()).await.unwrap_err();
        assert!(matches!(err, CompilerError::ArtifactMissing(_)));
    }

    #[tokio::test]
    async fn test_stale_artifact_does_not_leak_into_next_compile() {
        let dir = tempfile::tempdir().unwrap();
        let compiler = compiler_in(dir.path(), Arc::new(FakeHardhat::working()));
        compiler.compile(FOO.as_bytes()).await.unwrap();

        // Same name, but this toolchain run produces nothing.
        let silent = SourceCompiler::new(
            &CompilerConfig {
                workspace_dir: dir.path().to_path_buf(),
                ..Default::default()
            },
            Arc::new(FakeHardhat::default()),
        );
        let err = silent.compile(FOO.as_bytes()).await.unwrap_err();
        assert!(matches!(err, CompilerError::ArtifactMissing(_)));
    }

    #[tokio::test]
    async fn test_slot_is_replaced_by_next_compile() {
        let dir = tempfile::tempdir().unwrap();
        let compiler = compiler_in(dir.path(), Arc::new(FakeHardhat::working()));
        compiler.compile(FOO.as_bytes()).await.unwrap();
        compiler.compile(b"contract Bar {}").await.unwrap();

        assert!(compiler.artifact("Bar").is_ok());
        assert!(matches!(
            compiler.artifact("Foo"),
            Err(CompilerError::ArtifactMissing(_))
        ));
    }

    #[tokio::test]
    async fn test_concurrent_compiles_are_serialized() {
        let dir = tempfile::tempdir().unwrap();
        let toolchain = Arc::new(FakeHardhat {
            write_artifact: true,
            delay: Some(Duration::from_millis(50)),
            ..Default::default()
        });
        let compiler = Arc::new(compiler_in(dir.path(), toolchain.clone()));

        let a = {
            let c = Arc::clone(&compiler);
            tokio::spawn(async move { c.compile(b"contract A {}").await })
        };
        let b = {
            let c = Arc::clone(&compiler);
            tokio::spawn(async move { c.compile(b"contract B {}").await })
        };

        assert_eq!(a.await.unwrap().unwrap().name, "A");
        assert_eq!(b.await.unwrap().unwrap().name, "B");
        assert_eq!(toolchain.runs.load(Ordering::SeqCst), 2);
        assert_eq!(toolchain.max_active.load(Ordering::SeqCst), 1);
    }
}
