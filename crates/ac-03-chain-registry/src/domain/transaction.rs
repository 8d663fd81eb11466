//! # Transactions
//!
//! What callers ask the chain to execute and what they get back. Nonce,
//! gas price, signing and broadcast belong to the `ChainClient`.

use ethers::types::U256;
use shared_types::{Address, TxHash};

/// What a caller wants executed. Nonce, gas price and gas limit are filled
/// in by the client.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TxRequest {
    /// `None` creates a contract.
    pub to: Option<Address>,
    pub data: Vec<u8>,
    pub value: U256,
    /// Explicit gas limit; estimated when absent.
    pub gas_limit: Option<U256>,
}

impl TxRequest {
    /// A call to an existing contract.
    #[must_use]
    pub fn call(to: Address, data: Vec<u8>) -> Self {
        Self {
            to: Some(to),
            data,
            ..Self::default()
        }
    }

    /// A contract creation.
    #[must_use]
    pub fn create(init_code: Vec<u8>) -> Self {
        Self {
            to: None,
            data: init_code,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_creation(&self) -> bool {
        self.to.is_none()
    }
}

/// Mined transaction outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxReceipt {
    pub tx_hash: TxHash,
    /// `true` for status 1.
    pub success: bool,
    pub contract_address: Option<Address>,
    pub gas_used: u64,
    pub block_number: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        let call = TxRequest::call(Address([1; 20]), vec![0xaa]);
        assert_eq!(call.to, Some(Address([1; 20])));
        assert!(!call.is_creation());
        assert!(call.gas_limit.is_none());

        let create = TxRequest::create(vec![0x60, 0x80]);
        assert!(create.is_creation());
        assert_eq!(create.value, U256::zero());
    }
}
