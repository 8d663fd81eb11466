//! # Pending Store Adapters
//!
//! | Adapter | Durability | Use |
//! |---------|------------|-----|
//! | `InMemoryPendingStore` | none | tests |
//! | `FilePendingStore` | JSON file, atomic rename | default |
//! | `RocksDbPendingStore` | RocksDB column family | `rocksdb` feature |

pub mod file;
pub mod memory;
#[cfg(feature = "rocksdb")]
pub mod rocks;

pub use file::FilePendingStore;
pub use memory::InMemoryPendingStore;
#[cfg(feature = "rocksdb")]
pub use rocks::{RocksDbPendingStore, CF_PENDING_TRANSITIONS};
