//! Gas audit configuration.

use serde::{Deserialize, Serialize};

/// Limits for one `compare_usage` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Largest accepted batch. Every address is archived, so batches are
    /// kept small.
    pub max_batch_size: usize,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self { max_batch_size: 25 }
    }
}
