//! # Services
//!
//! Inbound port implementations over any `ChainClient`.

pub mod deployer;
pub mod registry;

pub use deployer::Deployer;
pub use registry::RegistryGateway;
