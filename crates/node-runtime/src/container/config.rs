//! # Node Configuration
//!
//! Unified configuration for every component.
//!
//! ## Load Order
//!
//! 1. Defaults
//! 2. TOML file named by `ARCHIVA_CONFIG`, if set
//! 3. Environment overrides (secrets normally arrive this way)
//! 4. `validate()`
//!
//! ## Security Requirements
//!
//! - The signing key is never serialized back out.
//! - The registry address has no default; a node without one refuses to start.

use ac_01_source_compiler::domain::config::CompilerConfig;
use ac_02_content_store::{ContentStoreBackend, ContentStoreConfig};
use ac_03_chain_registry::domain::config::{ChainConfig, ExplorerConfig, RegistryConfig};
use ac_04_lifecycle::domain::config::LifecycleConfig;
use ac_05_gas_audit::AuditConfig;
use ac_06_api_gateway::GatewayConfig;
use serde::{Deserialize, Serialize};
use shared_types::Address;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming the TOML config file.
pub const CONFIG_PATH_ENV: &str = "ARCHIVA_CONFIG";

/// Complete node configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    pub server: GatewayConfig,
    pub compiler: CompilerConfig,
    pub chain: ChainConfig,
    /// Registry contract. Required.
    pub registry: Option<RegistryConfig>,
    pub content_store: ContentStoreConfig,
    pub explorer: ExplorerConfig,
    pub lifecycle: LifecycleConfig,
    pub audit: AuditConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

/// Where pending transitions are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// JSON document, rewritten atomically.
    File,
    /// RocksDB column family. Requires the `rocksdb` feature.
    Rocksdb,
}

/// Storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Data directory for the pending-transition store.
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::File,
            data_dir: PathBuf::from("./data"),
        }
    }
}

impl StorageConfig {
    /// Path of the JSON pending store.
    #[must_use]
    pub fn pending_file(&self) -> PathBuf {
        self.data_dir.join("pending-transitions.json")
    }

    /// Path of the RocksDB database.
    #[must_use]
    pub fn rocksdb_dir(&self) -> PathBuf {
        self.data_dir.join("pending-db")
    }
}

/// Log output settings. `RUST_LOG` / `ARCHIVA_LOG` take precedence over
/// `level`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// One JSON object per line instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {error}")]
    Io { path: String, error: String },

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("invalid value for {name}: {detail}")]
    InvalidEnv { name: &'static str, detail: String },

    #[error("missing required setting: {0}")]
    Missing(&'static str),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl NodeConfig {
    /// Defaults, then the file named by `ARCHIVA_CONFIG`, then the process
    /// environment, then validation.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_file(path)?,
            Err(_) => Self::default(),
        };
        config.apply_env(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML file. Missing sections keep their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        Self::parse(&content)
    }

    /// Parse a TOML document.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply environment overrides read through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("ARCHIVA_RPC_URL") {
            self.chain.rpc_url = url;
        }
        if let Some(raw) = lookup("ARCHIVA_CHAIN_ID") {
            self.chain.chain_id = raw.parse().map_err(|e| ConfigError::InvalidEnv {
                name: "ARCHIVA_CHAIN_ID",
                detail: format!("{e}"),
            })?;
        }
        if let Some(key) = lookup("ARCHIVA_PRIVATE_KEY").or_else(|| lookup("ACCOUNT_PRIVATE_KEY")) {
            self.chain.private_key = key;
        }
        if let Some(raw) = lookup("ARCHIVA_REGISTRY_ADDRESS") {
            let address: Address = raw.parse().map_err(|e| ConfigError::InvalidEnv {
                name: "ARCHIVA_REGISTRY_ADDRESS",
                detail: format!("{e}"),
            })?;
            match self.registry.as_mut() {
                Some(registry) => registry.address = address,
                None => self.registry = Some(RegistryConfig::new(address)),
            }
        }
        if let Some(key) = lookup("PINATA_API_KEY") {
            self.content_store.api_key = key;
        }
        if let Some(secret) = lookup("PINATA_SECRET_API_KEY") {
            self.content_store.secret_api_key = secret;
        }
        if let Some(url) = lookup("BLOCKSCOUT_API_URL") {
            self.explorer.api_url = url;
        }
        if let Some(raw) = lookup("ARCHIVA_PORT") {
            self.server.port = raw.parse().map_err(|e| ConfigError::InvalidEnv {
                name: "ARCHIVA_PORT",
                detail: format!("{e}"),
            })?;
        }
        if let Some(dir) = lookup("ARCHIVA_DATA_DIR") {
            self.storage.data_dir = PathBuf::from(dir);
        }
        if let Some(raw) = lookup("ARCHIVA_LOG_JSON") {
            self.logging.json = matches!(raw.as_str(), "1" | "true" | "yes");
        }
        Ok(())
    }

    /// Reject configurations the node cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.registry.is_none() {
            return Err(ConfigError::Missing("registry address (ARCHIVA_REGISTRY_ADDRESS)"));
        }
        if self.chain.private_key.trim().is_empty() {
            return Err(ConfigError::Missing("signing key (ARCHIVA_PRIVATE_KEY)"));
        }
        if self.content_store.backend == ContentStoreBackend::Pinata
            && (self.content_store.api_key.is_empty() || self.content_store.secret_api_key.is_empty())
        {
            return Err(ConfigError::Missing(
                "Pinata credentials (PINATA_API_KEY, PINATA_SECRET_API_KEY)",
            ));
        }
        if self.lifecycle.max_confirm_attempts == 0 {
            return Err(ConfigError::Invalid(
                "lifecycle.max_confirm_attempts cannot be 0".into(),
            ));
        }
        if self.audit.max_batch_size == 0 {
            return Err(ConfigError::Invalid("audit.max_batch_size cannot be 0".into()));
        }
        if cfg!(not(feature = "rocksdb")) && self.storage.backend == StorageBackend::Rocksdb {
            return Err(ConfigError::Invalid(
                "storage.backend = \"rocksdb\" needs the rocksdb feature".into(),
            ));
        }
        self.server
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))
    }
}
