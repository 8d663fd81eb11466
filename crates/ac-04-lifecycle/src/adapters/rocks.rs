//! # RocksDB Pending Store
//!
//! One column family, `pending_transitions`, keyed by the 20 address bytes
//! with the JSON record as value. Writes are synced.

use crate::domain::pending::PendingTransition;
use crate::errors::PersistenceError;
use crate::ports::outbound::PendingTransitionStore;
use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, IteratorMode, Options, WriteOptions, DB};
use shared_types::Address;
use std::path::Path;

/// Column family holding pending transitions.
pub const CF_PENDING_TRANSITIONS: &str = "pending_transitions";

/// RocksDB-backed `PendingTransitionStore`.
pub struct RocksDbPendingStore {
    db: DB,
}

impl RocksDbPendingStore {
    /// Open or create the database at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PersistenceError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);
        opts.set_compression_type(rocksdb::DBCompressionType::Snappy);

        let mut cf_opts = Options::default();
        cf_opts.set_compression_type(rocksdb::DBCompressionType::Snappy);
        let cf = ColumnFamilyDescriptor::new(CF_PENDING_TRANSITIONS, cf_opts);

        let db = DB::open_cf_descriptors(&opts, path, vec![cf])
            .map_err(|e| PersistenceError::Backend(format!("Failed to open RocksDB: {e}")))?;
        Ok(Self { db })
    }

    fn cf(&self) -> Result<&rocksdb::ColumnFamily, PersistenceError> {
        self.db
            .cf_handle(CF_PENDING_TRANSITIONS)
            .ok_or_else(|| PersistenceError::Backend("missing column family".into()))
    }

    fn write_opts() -> WriteOptions {
        let mut opts = WriteOptions::default();
        opts.set_sync(true);
        opts
    }
}

fn decode(bytes: &[u8]) -> Result<PendingTransition, PersistenceError> {
    serde_json::from_slice(bytes).map_err(|e| PersistenceError::Corrupt(e.to_string()))
}

#[async_trait]
impl PendingTransitionStore for RocksDbPendingStore {
    async fn put(&self, transition: &PendingTransition) -> Result<(), PersistenceError> {
        let value =
            serde_json::to_vec(transition).map_err(|e| PersistenceError::Corrupt(e.to_string()))?;
        self.db
            .put_cf_opt(self.cf()?, transition.address.as_bytes(), value, &Self::write_opts())
            .map_err(|e| PersistenceError::Backend(format!("RocksDB put failed: {e}")))
    }

    async fn remove(&self, address: Address) -> Result<(), PersistenceError> {
        self.db
            .delete_cf_opt(self.cf()?, address.as_bytes(), &Self::write_opts())
            .map_err(|e| PersistenceError::Backend(format!("RocksDB delete failed: {e}")))
    }

    async fn get(&self, address: Address) -> Result<Option<PendingTransition>, PersistenceError> {
        self.db
            .get_cf(self.cf()?, address.as_bytes())
            .map_err(|e| PersistenceError::Backend(format!("RocksDB get failed: {e}")))?
            .map(|bytes| decode(&bytes))
            .transpose()
    }

    async fn list(&self) -> Result<Vec<PendingTransition>, PersistenceError> {
        self.db
            .iterator_cf(self.cf()?, IteratorMode::Start)
            .map(|item| {
                let (_, value) =
                    item.map_err(|e| PersistenceError::Backend(format!("RocksDB scan failed: {e}")))?;
                decode(&value)
            })
            .collect()
    }
}
