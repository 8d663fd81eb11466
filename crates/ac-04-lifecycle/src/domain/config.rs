//! Orchestrator timing and concurrency settings.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Lifecycle orchestrator configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifecycleConfig {
    /// Delay between the confirmed Pending write and the Archived write.
    #[serde(with = "humantime_serde")]
    pub archive_delay: Duration,
    /// Wait between failed confirmation attempts.
    #[serde(with = "humantime_serde")]
    pub retry_delay: Duration,
    /// Confirmation attempts before leaving the transition to the next
    /// startup recovery.
    pub max_confirm_attempts: u32,
    /// Concurrent state lookups when listing archived contracts.
    pub listing_concurrency: usize,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            archive_delay: Duration::from_secs(60),
            retry_delay: Duration::from_secs(30),
            max_confirm_attempts: 5,
            listing_concurrency: 8,
        }
    }
}
