//! Process-local pending store.

use crate::domain::pending::PendingTransition;
use crate::errors::PersistenceError;
use crate::ports::outbound::PendingTransitionStore;
use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::Address;
use std::collections::BTreeMap;

#[derive(Debug, Default)]
pub struct InMemoryPendingStore {
    records: RwLock<BTreeMap<Address, PendingTransition>>,
}

impl InMemoryPendingStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PendingTransitionStore for InMemoryPendingStore {
    async fn put(&self, transition: &PendingTransition) -> Result<(), PersistenceError> {
        self.records
            .write()
            .insert(transition.address, transition.clone());
        Ok(())
    }

    async fn remove(&self, address: Address) -> Result<(), PersistenceError> {
        self.records.write().remove(&address);
        Ok(())
    }

    async fn get(&self, address: Address) -> Result<Option<PendingTransition>, PersistenceError> {
        Ok(self.records.read().get(&address).cloned())
    }

    async fn list(&self) -> Result<Vec<PendingTransition>, PersistenceError> {
        Ok(self.records.read().values().cloned().collect())
    }
}
