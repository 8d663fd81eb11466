//! Chain, registry and explorer configuration.

use serde::{Deserialize, Serialize};
use shared_types::{Address, RetryPolicy};
use std::time::Duration;

/// Open Campus Codex chain id.
pub const DEFAULT_CHAIN_ID: u64 = 656_476;

/// EVM node connection and signing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    /// JSON-RPC endpoint.
    pub rpc_url: String,
    /// Chain id the wallet signs for (EIP-155).
    pub chain_id: u64,
    /// Hex-encoded secp256k1 key of the service account.
    #[serde(skip_serializing)]
    pub private_key: String,
    /// Per-request timeout.
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
    /// Transport retry schedule.
    pub retry: RetryPolicy,
    /// Interval between receipt polls.
    #[serde(with = "humantime_serde")]
    pub receipt_poll_interval: Duration,
    /// Give up waiting for a receipt after this long.
    #[serde(with = "humantime_serde")]
    pub confirmation_timeout: Duration,
    /// Headroom applied to `eth_estimateGas`, in percent.
    pub gas_limit_multiplier_percent: u64,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://rpc.open-campus-codex.gelato.digital".to_string(),
            chain_id: DEFAULT_CHAIN_ID,
            private_key: String::new(),
            request_timeout: Duration::from_secs(30),
            retry: RetryPolicy::default(),
            receipt_poll_interval: Duration::from_secs(2),
            confirmation_timeout: Duration::from_secs(120),
            gas_limit_multiplier_percent: 120,
        }
    }
}

/// Human-readable declarations of the registry contract's functions.
///
/// Overridable so a redeployed registry with renamed functions needs only
/// configuration. Each declaration must keep the parameter and return
/// shape noted on its field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryFunctions {
    /// `(address)`
    pub add_contract: String,
    /// `(address, uint8, string)`
    pub update_state: String,
    /// `(address) returns (uint8, string)`
    pub get_state: String,
    /// `() returns (address[])`
    pub get_all: String,
}

impl Default for RegistryFunctions {
    fn default() -> Self {
        Self {
            add_contract: "function addContract(address contractAddress)".to_string(),
            update_state:
                "function updateContractState(address contractAddress, uint8 state, string cid)"
                    .to_string(),
            get_state:
                "function getContractState(address contractAddress) view returns (uint8, string)"
                    .to_string(),
            get_all: "function getAllContracts() view returns (address[])".to_string(),
        }
    }
}

/// The registry contract this service writes to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    pub address: Address,
    #[serde(default)]
    pub functions: RegistryFunctions,
}

impl RegistryConfig {
    #[must_use]
    pub fn new(address: Address) -> Self {
        Self {
            address,
            functions: RegistryFunctions::default(),
        }
    }
}

/// Blockscout-compatible explorer API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    /// Base URL of the `module=...&action=...` API.
    pub api_url: String,
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            api_url: "https://edu-chain-testnet.blockscout.com/api".to_string(),
            request_timeout: Duration::from_secs(30),
            retry: RetryPolicy::default(),
        }
    }
}
