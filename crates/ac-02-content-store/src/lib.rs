//! # AC-02 Content Store - Content-Addressed Archive Storage
//!
//! **Component ID:** 2
//!
//! ## Purpose
//!
//! Uploads and retrieves opaque JSON blobs (archived contract source and
//! metadata) to and from a content-addressed store, exchanging `ContentId`s.
//!
//! ## Guarantees
//!
//! | Guarantee | Enforcement Location |
//! |-----------|---------------------|
//! | Upload returns a usable id or fails entirely | `adapters/pinata.rs` - `upload()` |
//! | `ContentNotFound` is distinct from `StoreUnavailable` | `errors.rs`, `adapters/pinata.rs` - `retrieve()` |
//! | Identical input yields identical id | `adapters/memory.rs` - `content_id_for()` |
//!
//! ## Adapters
//!
//! | Adapter | Backend |
//! |---------|---------|
//! | `PinataContentStore` | Pinata pinning API + IPFS gateway |
//! | `InMemoryContentStore` | Process-local map keyed by SHA-256 |

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod adapters;
pub mod config;
pub mod errors;
pub mod ports;

pub use adapters::{InMemoryContentStore, PinataContentStore};
pub use config::{ContentStoreBackend, ContentStoreConfig};
pub use errors::StoreError;
pub use ports::ContentStore;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Component ID.
pub const COMPONENT_ID: u8 = 2;
