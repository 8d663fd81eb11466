//! # Domain Layer

pub mod claims;
pub mod config;
pub mod pending;
