//! Durable record of a deferred Pending -> Archived confirmation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared_types::{Address, ContentId, ContractState};
use std::time::Duration;

/// A confirmation that must eventually write `target_state` for `address`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingTransition {
    pub address: Address,
    pub target_state: ContractState,
    pub content_id: ContentId,
    pub started_at: DateTime<Utc>,
    pub due_at: DateTime<Utc>,
}

impl PendingTransition {
    /// An archive confirmation due `delay` after `now`.
    #[must_use]
    pub fn archive(address: Address, content_id: ContentId, now: DateTime<Utc>, delay: Duration) -> Self {
        let delay = chrono::Duration::from_std(delay).unwrap_or_else(|_| chrono::Duration::days(36_500));
        Self {
            address,
            target_state: ContractState::Archived,
            content_id,
            started_at: now,
            due_at: now.checked_add_signed(delay).unwrap_or(DateTime::<Utc>::MAX_UTC),
        }
    }

    /// Time left until due, zero if overdue.
    #[must_use]
    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        (self.due_at - now).to_std().unwrap_or(Duration::ZERO)
    }
}
