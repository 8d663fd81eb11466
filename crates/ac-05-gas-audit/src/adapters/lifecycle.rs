//! Archive through the lifecycle orchestrator.

use crate::errors::AuditError;
use crate::ports::ArchiveDriver;
use ac_04_lifecycle::errors::LifecycleError;
use ac_04_lifecycle::ports::inbound::LifecycleApi;
use async_trait::async_trait;
use shared_types::{Address, ContentId, ContractState};
use std::sync::Arc;

pub struct LifecycleArchiveDriver {
    lifecycle: Arc<dyn LifecycleApi>,
}

impl LifecycleArchiveDriver {
    pub fn new(lifecycle: Arc<dyn LifecycleApi>) -> Self {
        Self { lifecycle }
    }
}

fn audit_error(err: LifecycleError) -> AuditError {
    AuditError::Lifecycle {
        kind: err.kind().to_string(),
        detail: err.to_string(),
    }
}

#[async_trait]
impl ArchiveDriver for LifecycleArchiveDriver {
    async fn archive(&self, address: Address) -> Result<ContentId, AuditError> {
        self.lifecycle.archive(address).await.map_err(audit_error)
    }

    async fn state(&self, address: Address) -> Result<ContractState, AuditError> {
        self.lifecycle
            .get_state(address)
            .await
            .map(|record| record.state)
            .map_err(audit_error)
    }
}
