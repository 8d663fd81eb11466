//! # Ports
//!
//! - `inbound`: the API the HTTP gateway and the gas audit drive
//! - `outbound`: collaborators this component needs beyond ac-01..ac-03

pub mod inbound;
pub mod outbound;
