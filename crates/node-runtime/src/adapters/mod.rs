//! # Runtime Adapters
//!
//! Glue between components whose ports are defined in different crates.

pub mod source;

pub use source::ExplorerSourceFetcher;
