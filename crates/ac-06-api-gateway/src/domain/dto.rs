//! Request and response bodies.
//!
//! Field names are camelCase on the wire.

use ac_04_lifecycle::ports::inbound::ListingFailure;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use shared_types::{Address, ContentId, ContractRecord, ContractState, TxHash};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileResponse {
    pub contract_name: String,
    pub abi: Value,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployRequest {
    pub contract_name: String,
    #[serde(default)]
    pub constructor_args: Vec<Value>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployResponse {
    pub address: Address,
    pub transaction_hash: TxHash,
    pub registration_transaction_hash: TxHash,
    pub gas_used: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveRequest {
    pub contract_address: Address,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveResponse {
    pub contract_address: Address,
    pub content_id: ContentId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStateRequest {
    pub contract_address: Address,
    #[serde(deserialize_with = "state_name_or_number")]
    pub new_state: ContractState,
    #[serde(default = "ContentId::empty")]
    pub content_id: ContentId,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStateResponse {
    pub contract_address: Address,
    pub new_state: ContractState,
    pub content_id: ContentId,
    pub transaction_hash: TxHash,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchivedContractsResponse {
    pub archived_contracts: Vec<ContractRecord>,
    pub failures: Vec<ListingFailure>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareRequest {
    pub contract_addresses: Vec<Address>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_transitions: Option<usize>,
}

/// `"Archived"`, `"archived"`, `"2"` and `2` all name the same state.
fn state_name_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ContractState, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => u8::try_from(n)
            .ok()
            .and_then(|n| ContractState::try_from(n).ok())
            .ok_or_else(|| serde::de::Error::custom(format!("unknown contract state {n}"))),
        Raw::Text(text) => text.parse().map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(new_state: Value) -> Result<UpdateStateRequest, serde_json::Error> {
        serde_json::from_value(json!({
            "contractAddress": "0x0101010101010101010101010101010101010101",
            "newState": new_state,
            "contentId": "QmX",
        }))
    }

    #[test]
    fn test_new_state_accepts_names_and_numbers() {
        assert_eq!(parse(json!("Archived")).unwrap().new_state, ContractState::Archived);
        assert_eq!(parse(json!("pending")).unwrap().new_state, ContractState::Pending);
        assert_eq!(parse(json!(0)).unwrap().new_state, ContractState::Active);
        assert_eq!(parse(json!("2")).unwrap().new_state, ContractState::Archived);
    }

    #[test]
    fn test_new_state_rejects_unknown() {
        assert!(parse(json!(3)).is_err());
        assert!(parse(json!("Deleted")).is_err());
        assert!(parse(json!(-1)).is_err());
    }

    #[test]
    fn test_deploy_request_defaults_args() {
        let req: DeployRequest = serde_json::from_value(json!({"contractName": "Foo"})).unwrap();
        assert!(req.constructor_args.is_empty());
    }
}
