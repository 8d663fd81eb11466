//! Content store configuration.

use serde::{Deserialize, Serialize};
use shared_types::RetryPolicy;
use std::time::Duration;

/// Which adapter backs the content store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentStoreBackend {
    /// Pinata pinning service.
    Pinata,
    /// Process-local store (development only, lost on restart).
    Memory,
}

/// Content store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentStoreConfig {
    pub backend: ContentStoreBackend,
    /// Pinning API base URL.
    pub api_url: String,
    /// IPFS gateway base URL used for retrieval.
    pub gateway_url: String,
    /// Pinata API key.
    pub api_key: String,
    /// Pinata API secret.
    pub secret_api_key: String,
    /// Per-request timeout.
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
    /// Transport retry schedule.
    pub retry: RetryPolicy,
}

impl Default for ContentStoreConfig {
    fn default() -> Self {
        Self {
            backend: ContentStoreBackend::Pinata,
            api_url: "https://api.pinata.cloud".to_string(),
            gateway_url: "https://gateway.pinata.cloud".to_string(),
            api_key: String::new(),
            secret_api_key: String::new(),
            request_timeout: Duration::from_secs(30),
            retry: RetryPolicy::default(),
        }
    }
}
