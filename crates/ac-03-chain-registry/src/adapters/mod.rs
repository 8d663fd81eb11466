//! # Adapters
//!
//! - `rpc`: `ethers` provider, wallet and nonce manager over HTTP
//! - `explorer`: Blockscout API client
//! - `memory`: in-process chain and registry

pub mod explorer;
pub mod memory;
pub mod rpc;

pub use explorer::{BlockscoutExplorer, ExplorerError, ExplorerTransaction};
pub use memory::{InMemoryChain, InMemoryRegistry, StateWrite};
pub use rpc::JsonRpcChainClient;
