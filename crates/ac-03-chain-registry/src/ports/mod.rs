//! # Ports
//!
//! - `inbound`: what the lifecycle orchestrator drives (registry, deployer)
//! - `outbound`: what this component needs from the chain

pub mod inbound;
pub mod outbound;
