//! # Archiva Node Runtime
//!
//! Runs the contract archival service: loads [`NodeConfig`], builds every
//! component in a [`ServiceContainer`], replays persisted pending
//! transitions and serves the HTTP API.
//!
//! ## Modular Structure
//!
//! - `container/` - Configuration and component wiring
//! - `adapters/` - Ports implemented by one component for another
//! - `telemetry` - Tracing subscriber
//!
//! ## Startup Sequence
//!
//! 1. Load configuration (defaults, `ARCHIVA_CONFIG` TOML file, environment)
//! 2. Validate (registry address, signing key, store credentials)
//! 3. Install the tracing subscriber
//! 4. Build components and check the RPC endpoint's chain id
//! 5. Recover pending transitions left by a previous run
//! 6. Serve until Ctrl+C
//!
//! ## Environment
//!
//! | Variable | Setting |
//! |----------|---------|
//! | `ARCHIVA_CONFIG` | Path to a TOML config file |
//! | `ARCHIVA_RPC_URL` | `chain.rpc_url` |
//! | `ARCHIVA_CHAIN_ID` | `chain.chain_id` |
//! | `ARCHIVA_PRIVATE_KEY` / `ACCOUNT_PRIVATE_KEY` | `chain.private_key` |
//! | `ARCHIVA_REGISTRY_ADDRESS` | `registry.address` |
//! | `PINATA_API_KEY` / `PINATA_SECRET_API_KEY` | Content store credentials |
//! | `BLOCKSCOUT_API_URL` | `explorer.api_url` |
//! | `ARCHIVA_PORT` | `server.port` |
//! | `ARCHIVA_DATA_DIR` | `storage.data_dir` |
//! | `ARCHIVA_LOG_JSON` | `logging.json` |
//! | `ARCHIVA_LOG` | Tracing filter, overrides `RUST_LOG` |

pub mod adapters;
pub mod container;
pub mod telemetry;

pub use container::{NodeConfig, ServiceContainer};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
