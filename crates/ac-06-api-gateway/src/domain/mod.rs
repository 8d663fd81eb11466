//! Gateway domain: configuration, wire types and error mapping.

pub mod config;
pub mod dto;
pub mod error;
