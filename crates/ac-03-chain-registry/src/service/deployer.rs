//! Contract deployment.

use crate::domain::encoding::encode_deploy_data;
use crate::domain::transaction::TxRequest;
use crate::errors::ChainError;
use crate::ports::inbound::{ContractDeployer, DeployedContract};
use crate::ports::outbound::ChainClient;
use async_trait::async_trait;
use shared_types::ContractArtifact;
use std::sync::Arc;
use tracing::{info, instrument};

/// Deploys artifacts through a `ChainClient`.
pub struct Deployer {
    chain: Arc<dyn ChainClient>,
}

impl Deployer {
    pub fn new(chain: Arc<dyn ChainClient>) -> Self {
        Self { chain }
    }
}

#[async_trait]
impl ContractDeployer for Deployer {
    #[instrument(skip(self, artifact, constructor_args), fields(contract = %artifact.name))]
    async fn deploy(
        &self,
        artifact: &ContractArtifact,
        constructor_args: &[serde_json::Value],
    ) -> Result<DeployedContract, ChainError> {
        if artifact.bytecode.is_empty() {
            // Abstract contracts and interfaces compile to empty bytecode.
            return Err(ChainError::InvalidResponse(format!(
                "artifact {} has no creation bytecode",
                artifact.name
            )));
        }

        let init_code =
            encode_deploy_data(&artifact.abi, &artifact.bytecode, constructor_args)?;

        let receipt = self.chain.transact(TxRequest::create(init_code)).await?;
        let address = receipt.contract_address.ok_or_else(|| {
            ChainError::InvalidResponse(format!(
                "receipt {} has no contract address",
                receipt.tx_hash
            ))
        })?;

        let code = self.chain.get_code(address).await?;
        if code.is_empty() {
            return Err(ChainError::EmptyDeployment {
                address,
                tx_hash: receipt.tx_hash,
            });
        }

        info!(%address, tx_hash = %receipt.tx_hash, gas_used = receipt.gas_used, "Contract deployed");
        Ok(DeployedContract {
            address,
            tx_hash: receipt.tx_hash,
            gas_used: receipt.gas_used,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryChain;
    use serde_json::json;

    fn artifact(bytecode: Vec<u8>) -> ContractArtifact {
        ContractArtifact {
            name: "Foo".into(),
            abi: json!([{"type": "constructor", "inputs": [{"name": "x", "type": "uint256"}]}]),
            bytecode,
        }
    }

    #[tokio::test]
    async fn test_deploy_returns_address_with_code() {
        let chain = Arc::new(InMemoryChain::new());
        let deployer = Deployer::new(chain.clone());

        let deployed = deployer
            .deploy(&artifact(vec![0x60, 0x80]), &[json!(5)])
            .await
            .unwrap();

        assert!(!chain.get_code(deployed.address).await.unwrap().is_empty());
        let init_code = chain.last_creation().unwrap();
        assert_eq!(&init_code[..2], &[0x60, 0x80]);
        assert_eq!(init_code.len(), 2 + 32);
        assert_eq!(init_code[33], 5);
    }

    #[tokio::test]
    async fn test_deploy_with_empty_code_fails() {
        // Arrange
        let chain = Arc::new(InMemoryChain::new());
        chain.set_deploy_empty_code(true);
        let deployer = Deployer::new(chain);

        // Act
        let err = deployer
            .deploy(&artifact(vec![0x60, 0x80]), &[json!(1)])
            .await
            .unwrap_err();

        // Assert
        assert!(matches!(err, ChainError::EmptyDeployment { .. }));
    }

    #[tokio::test]
    async fn test_deploy_reverted_creation_is_reverted() {
        let chain = Arc::new(InMemoryChain::new());
        chain.revert_next_transaction(Some("constructor failed"));
        let err = Deployer::new(chain)
            .deploy(&artifact(vec![0x60]), &[json!(1)])
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "TransactionReverted");
    }

    #[tokio::test]
    async fn test_deploy_rejects_wrong_argument_count_before_sending() {
        let chain = Arc::new(InMemoryChain::new());
        let err = Deployer::new(chain.clone())
            .deploy(&artifact(vec![0x60]), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, ChainError::Abi(_)));
        assert!(chain.last_creation().is_none());
    }

    #[tokio::test]
    async fn test_deploy_with_fixed_array_and_tuple_constructor() {
        // Arrange
        let chain = Arc::new(InMemoryChain::new());
        let artifact = ContractArtifact {
            name: "Vault".into(),
            abi: json!([{
                "type": "constructor",
                "inputs": [
                    {"name": "limits", "type": "uint256[2]"},
                    {"name": "owner", "type": "tuple", "components": [
                        {"name": "account", "type": "address"},
                        {"name": "weight", "type": "uint8"}
                    ]}
                ]
            }]),
            bytecode: vec![0x60, 0x80],
        };
        let args = [
            json!([10, 20]),
            json!(["0x5fbdb2315678afecb367f032d93f642f64180aa3", 3]),
        ];

        // Act
        let deployed = Deployer::new(chain.clone())
            .deploy(&artifact, &args)
            .await
            .unwrap();

        // Assert
        assert!(!chain.get_code(deployed.address).await.unwrap().is_empty());
        let init_code = chain.last_creation().unwrap();
        // Two static words for the array, two for the tuple.
        assert_eq!(init_code.len(), 2 + 4 * 32);
        assert_eq!(init_code[2 + 31], 10);
        assert_eq!(init_code[2 + 63], 20);
        assert_eq!(init_code[2 + 127], 3);
    }

    #[tokio::test]
    async fn test_abstract_artifact_is_refused() {
        let chain = Arc::new(InMemoryChain::new());
        let err = Deployer::new(chain)
            .deploy(&artifact(Vec::new()), &[json!(1)])
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "ChainInvalidResponse");
    }
}
