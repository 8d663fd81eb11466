//! # Domain Layer
//!
//! Configuration, contract-name scanning and the build workspace layout.

pub mod config;
pub mod scanner;
pub mod workspace;
