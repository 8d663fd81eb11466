//! # Ports
//!
//! Outbound ports (SPI) the compiler depends on.

pub mod outbound;
