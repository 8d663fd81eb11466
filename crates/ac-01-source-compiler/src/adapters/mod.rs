//! # Adapters
//!
//! Concrete toolchain implementations.

pub mod command;

pub use command::CommandToolchain;
