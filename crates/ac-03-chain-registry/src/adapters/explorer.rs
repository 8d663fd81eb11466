//! # Blockscout Explorer
//!
//! Read-only access to the explorer's Etherscan-compatible API:
//!
//! - `module=contract&action=getsourcecode`: verified source and metadata,
//!   the blob that gets archived.
//! - `module=account&action=txlist`: transaction history, used for gas
//!   accounting.

use crate::domain::config::ExplorerConfig;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use serde_with::{serde_as, DisplayFromStr};
use shared_types::{retry_with_backoff, Address};
use thiserror::Error;
use tracing::{debug, instrument};

/// Explorer failures.
#[derive(Debug, Clone, Error)]
pub enum ExplorerError {
    /// Transport failure, 429 or 5xx after retries.
    #[error("explorer unavailable: {0}")]
    Unavailable(String),

    /// The explorer knows nothing about this address.
    #[error("explorer has no data for {0}")]
    NotFound(Address),

    #[error("invalid explorer response: {0}")]
    InvalidResponse(String),
}

impl ExplorerError {
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unavailable(_) => "ExplorerUnavailable",
            Self::NotFound(_) => "SourceNotFound",
            Self::InvalidResponse(_) => "ExplorerInvalidResponse",
        }
    }

    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

#[derive(Debug, Deserialize)]
struct Envelope {
    status: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    result: Value,
}

/// One entry of an account's transaction list.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplorerTransaction {
    pub hash: String,
    #[serde_as(as = "DisplayFromStr")]
    pub block_number: u64,
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub to: String,
    #[serde_as(as = "DisplayFromStr")]
    pub gas_used: u64,
    #[serde(default)]
    pub input: String,
    /// `"1"` when the transaction failed.
    #[serde(default)]
    pub is_error: String,
}

/// Client for a Blockscout (Etherscan-compatible) API.
#[derive(Debug, Clone)]
pub struct BlockscoutExplorer {
    client: reqwest::Client,
    config: ExplorerConfig,
}

impl BlockscoutExplorer {
    pub fn new(config: ExplorerConfig) -> Result<Self, ExplorerError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ExplorerError::Unavailable(format!("http client: {e}")))?;
        Ok(Self { client, config })
    }

    async fn query_once(&self, params: &[(&str, String)]) -> Result<Envelope, ExplorerError> {
        let response = self
            .client
            .get(&self.config.api_url)
            .query(params)
            .send()
            .await
            .map_err(|e| ExplorerError::Unavailable(e.to_string()))?;
        let status = response.status();
        if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ExplorerError::Unavailable(format!("HTTP {status}")));
        }
        if !status.is_success() {
            return Err(ExplorerError::InvalidResponse(format!("HTTP {status}")));
        }
        response
            .json()
            .await
            .map_err(|e| ExplorerError::InvalidResponse(e.to_string()))
    }

    async fn query(&self, operation: &str, params: Vec<(&str, String)>) -> Result<Envelope, ExplorerError> {
        let params = params.as_slice();
        retry_with_backoff(
            &self.config.retry,
            operation,
            ExplorerError::is_transient,
            move || self.query_once(params),
        )
        .await
    }

    /// Verified source code and compiler metadata for `address`.
    ///
    /// Returns the explorer's record unchanged (`SourceCode`, `ABI`,
    /// `ContractName`, `CompilerVersion`, ...).
    #[instrument(skip(self), fields(%address))]
    pub async fn contract_source(&self, address: Address) -> Result<Value, ExplorerError> {
        let envelope = self
            .query(
                "explorer.getsourcecode",
                vec![
                    ("module", "contract".to_string()),
                    ("action", "getsourcecode".to_string()),
                    ("address", address.to_string()),
                ],
            )
            .await?;
        if envelope.status != "1" {
            debug!(message = %envelope.message, "Explorer returned no source");
            return Err(ExplorerError::NotFound(address));
        }
        match envelope.result {
            Value::Array(mut entries) if !entries.is_empty() => Ok(entries.swap_remove(0)),
            other => Err(ExplorerError::InvalidResponse(format!(
                "unexpected getsourcecode result: {other}"
            ))),
        }
    }

    /// Every transaction touching `address`, oldest first.
    #[instrument(skip(self), fields(%address))]
    pub async fn transactions(&self, address: Address) -> Result<Vec<ExplorerTransaction>, ExplorerError> {
        let envelope = self
            .query(
                "explorer.txlist",
                vec![
                    ("module", "account".to_string()),
                    ("action", "txlist".to_string()),
                    ("address", address.to_string()),
                    ("sort", "asc".to_string()),
                ],
            )
            .await?;
        if envelope.status != "1" {
            // "No transactions found" is reported as status 0.
            if envelope.result.as_array().is_some_and(Vec::is_empty) {
                return Ok(Vec::new());
            }
            return Err(ExplorerError::InvalidResponse(envelope.message));
        }
        serde_json::from_value(envelope.result)
            .map_err(|e| ExplorerError::InvalidResponse(format!("txlist: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Query;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;
    use shared_types::RetryPolicy;
    use std::collections::HashMap;
    use std::time::Duration;

    const KNOWN: &str = "0x1111111111111111111111111111111111111111";

    async fn api(Query(q): Query<HashMap<String, String>>) -> Json<Value> {
        let known = q.get("address").map(String::as_str) == Some(KNOWN);
        match (q.get("action").map(String::as_str), known) {
            (Some("getsourcecode"), true) => Json(json!({
                "status": "1", "message": "OK",
                "result": [{"ContractName": "Foo", "SourceCode": "contract Foo {}", "ABI": "[]"}]
            })),
            (Some("txlist"), true) => Json(json!({
                "status": "1", "message": "OK",
                "result": [
                    {"hash": "0xaa", "blockNumber": "10", "gasUsed": "21000", "isError": "0"},
                    {"hash": "0xbb", "blockNumber": "12", "gasUsed": "50000", "isError": "0"}
                ]
            })),
            (Some("txlist"), false) => Json(json!({
                "status": "0", "message": "No transactions found", "result": []
            })),
            _ => Json(json!({"status": "0", "message": "NOTOK", "result": null})),
        }
    }

    async fn explorer() -> BlockscoutExplorer {
        let app = Router::new().route("/api", get(api));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await });
        BlockscoutExplorer::new(ExplorerConfig {
            api_url: format!("http://{addr}/api"),
            request_timeout: Duration::from_secs(2),
            retry: RetryPolicy::none(),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_contract_source_returns_first_record() {
        let source = explorer()
            .await
            .contract_source(KNOWN.parse().unwrap())
            .await
            .unwrap();
        assert_eq!(source["ContractName"], "Foo");
    }

    #[tokio::test]
    async fn test_unknown_contract_is_not_found() {
        let err = explorer()
            .await
            .contract_source(Address([9; 20]))
            .await
            .unwrap_err();
        assert!(matches!(err, ExplorerError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_transactions_parse_gas() {
        let txs = explorer()
            .await
            .transactions(KNOWN.parse().unwrap())
            .await
            .unwrap();
        assert_eq!(txs.iter().map(|t| t.gas_used).sum::<u64>(), 71_000);
        assert_eq!(txs[1].block_number, 12);
    }

    #[tokio::test]
    async fn test_empty_history_is_not_an_error() {
        let txs = explorer().await.transactions(Address([9; 20])).await.unwrap();
        assert!(txs.is_empty());
    }
}
