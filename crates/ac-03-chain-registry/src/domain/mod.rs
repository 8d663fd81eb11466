//! # Domain Layer
//!
//! Component configuration, transaction shapes and the glue between
//! workspace types and `ethers` ABI types. No I/O.

pub mod config;
pub mod encoding;
pub mod transaction;
