//! # JSON-RPC Chain Client
//!
//! `ethers` middleware stack over the configured HTTP endpoint:
//!
//! ```text
//! NonceManagerMiddleware -> SignerMiddleware<LocalWallet> -> Provider<Http>
//! ```
//!
//! | Failure | Outcome |
//! |---------|---------|
//! | transport error or request timeout | reads retried, then `ChainUnavailable` |
//! | JSON-RPC error with revert data | `TransactionReverted` (not retried) |
//! | other JSON-RPC error | `Rpc { code, message }` (not retried) |
//! | unparseable node response | `InvalidResponse` |
//! | no receipt before `confirmation_timeout` | `ChainUnavailable` |
//!
//! Broadcasts are never retried: a transport failure after submission is
//! ambiguous and surfaces as `ChainUnavailable` for the caller to resolve.

use crate::domain::config::ChainConfig;
use crate::domain::encoding::{clamp_u64, from_h160, from_h256, to_h160, to_h256};
use crate::domain::transaction::{TxReceipt, TxRequest};
use crate::errors::ChainError;
use crate::ports::outbound::{revert_from_data, ChainClient};
use async_trait::async_trait;
use ethers::middleware::{NonceManagerMiddleware, SignerMiddleware};
use ethers::providers::{Http, Middleware, MiddlewareError, Provider};
use ethers::signers::{LocalWallet, Signer};
use ethers::types::transaction::eip2718::TypedTransaction;
use ethers::types::{TransactionReceipt, TransactionRequest, U256, U64};
use serde_json::Value;
use shared_types::{decode_hex, retry_with_backoff, Address, TxHash};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, instrument};

type SignerClient = NonceManagerMiddleware<SignerMiddleware<Provider<Http>, LocalWallet>>;

/// `ChainClient` over HTTP JSON-RPC with an in-process signing key.
pub struct JsonRpcChainClient {
    client: SignerClient,
    config: ChainConfig,
    sender: Address,
}

impl JsonRpcChainClient {
    /// Build the middleware stack. Performs no network calls.
    pub fn new(config: ChainConfig) -> Result<Self, ChainError> {
        let wallet = load_wallet(&config.private_key, config.chain_id)?;
        let provider = Provider::<Http>::try_from(config.rpc_url.as_str())
            .map_err(|e| ChainError::Config(format!("rpc url {}: {e}", config.rpc_url)))?
            .interval(config.receipt_poll_interval);

        let address = wallet.address();
        let client = NonceManagerMiddleware::new(SignerMiddleware::new(provider, wallet), address);
        Ok(Self {
            client,
            config,
            sender: from_h160(address),
        })
    }

    /// Compare the node's `eth_chainId` with the configured id.
    pub async fn verify_chain_id(&self) -> Result<(), ChainError> {
        let remote = self
            .read("eth_chainId", move || self.client.get_chainid())
            .await?;
        if remote != U256::from(self.config.chain_id) {
            return Err(ChainError::InvalidResponse(format!(
                "node reports chain id {remote}, configured {}",
                self.config.chain_id
            )));
        }
        info!(chain_id = self.config.chain_id, sender = %self.sender, "Connected to chain");
        Ok(())
    }

    /// Run a read-only request with the configured timeout and retries.
    async fn read<T, E, F, Fut>(&self, operation: &'static str, op: F) -> Result<T, ChainError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: MiddlewareError,
    {
        let timeout = self.config.request_timeout;
        retry_with_backoff(&self.config.retry, operation, ChainError::is_transient, || {
            bounded(timeout, operation, op())
        })
        .await
    }

    fn typed_request(&self, tx: &TxRequest) -> TypedTransaction {
        let mut request = TransactionRequest::new()
            .from(to_h160(self.sender))
            .data(tx.data.clone())
            .value(tx.value);
        if let Some(to) = tx.to {
            request = request.to(to_h160(to));
        }
        request.into()
    }

    async fn estimate_gas(&self, typed: &TypedTransaction) -> Result<U256, ChainError> {
        let estimate = self
            .read("eth_estimateGas", move || self.client.estimate_gas(typed, None))
            .await?;
        Ok(pad_gas_estimate(
            estimate,
            self.config.gas_limit_multiplier_percent,
        ))
    }
}

fn load_wallet(key: &str, chain_id: u64) -> Result<LocalWallet, ChainError> {
    let key = key.trim();
    if key.is_empty() {
        return Err(ChainError::Signer("private key not configured".into()));
    }
    let wallet = key
        .trim_start_matches("0x")
        .parse::<LocalWallet>()
        .map_err(|e| ChainError::Signer(e.to_string()))?;
    Ok(wallet.with_chain_id(chain_id))
}

/// Apply percentage headroom to a gas estimate without narrowing it.
#[must_use]
pub fn pad_gas_estimate(estimate: U256, percent: u64) -> U256 {
    estimate.saturating_mul(U256::from(percent)) / U256::from(100u8)
}

async fn bounded<T, E: MiddlewareError>(
    timeout: Duration,
    operation: &str,
    request: impl Future<Output = Result<T, E>>,
) -> Result<T, ChainError> {
    match tokio::time::timeout(timeout, request).await {
        Ok(result) => result.map_err(map_middleware_error),
        Err(_) => Err(ChainError::ChainUnavailable(format!(
            "{operation} timed out after {timeout:?}"
        ))),
    }
}

fn map_middleware_error<E: MiddlewareError>(err: E) -> ChainError {
    if let Some(response) = err.as_error_response() {
        return rpc_error(response.code, &response.message, response.data.as_ref());
    }
    if err.is_serde_error() {
        return ChainError::InvalidResponse(err.to_string());
    }
    ChainError::ChainUnavailable(err.to_string())
}

/// Classify a JSON-RPC error object.
fn rpc_error(code: i64, message: &str, data: Option<&Value>) -> ChainError {
    let revert_data = data
        .and_then(Value::as_str)
        .and_then(|raw| decode_hex(raw).ok());
    match revert_data {
        Some(data) if code == 3 || message.contains("revert") => revert_from_data(&data),
        _ if message.contains("execution reverted") => ChainError::TransactionReverted {
            tx_hash: None,
            reason: message
                .strip_prefix("execution reverted: ")
                .map(str::to_string),
        },
        _ => ChainError::Rpc {
            code,
            message: message.to_string(),
        },
    }
}

fn receipt_from(raw: &TransactionReceipt) -> TxReceipt {
    TxReceipt {
        tx_hash: from_h256(raw.transaction_hash),
        // Pre-Byzantium receipts carry no status; treat them as successful.
        success: raw.status.map_or(true, |status| status == U64::from(1)),
        contract_address: raw.contract_address.map(from_h160),
        gas_used: raw.gas_used.map_or(0, clamp_u64),
        block_number: raw.block_number.map_or(0, |n| n.as_u64()),
    }
}

#[async_trait]
impl ChainClient for JsonRpcChainClient {
    fn chain_id(&self) -> u64 {
        self.config.chain_id
    }

    fn sender(&self) -> Address {
        self.sender
    }

    #[instrument(skip(self), fields(%address))]
    async fn get_code(&self, address: Address) -> Result<Vec<u8>, ChainError> {
        let target = to_h160(address);
        let code = self
            .read("eth_getCode", move || self.client.get_code(target, None))
            .await?;
        Ok(code.to_vec())
    }

    #[instrument(skip(self, data), fields(%to))]
    async fn call(&self, to: Address, data: Vec<u8>) -> Result<Vec<u8>, ChainError> {
        let typed: TypedTransaction = TransactionRequest::new()
            .to(to_h160(to))
            .data(data)
            .into();
        let typed = &typed;
        let output = self
            .read("eth_call", move || self.client.call(typed, None))
            .await?;
        Ok(output.to_vec())
    }

    #[instrument(skip(self, tx), fields(to = ?tx.to, data_len = tx.data.len()))]
    async fn send_transaction(&self, tx: TxRequest) -> Result<TxHash, ChainError> {
        let mut typed = self.typed_request(&tx);
        let gas_limit = match tx.gas_limit {
            Some(limit) => limit,
            None => self.estimate_gas(&typed).await?,
        };
        typed.set_gas(gas_limit);

        let pending = bounded(
            self.config.request_timeout,
            "eth_sendRawTransaction",
            self.client.send_transaction(typed, None),
        )
        .await?;
        let tx_hash = from_h256(pending.tx_hash());
        debug!(%tx_hash, %gas_limit, "Transaction broadcast");
        Ok(tx_hash)
    }

    #[instrument(skip(self), fields(%tx_hash))]
    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<TxReceipt, ChainError> {
        let hash = to_h256(tx_hash);
        let deadline = Instant::now() + self.config.confirmation_timeout;
        loop {
            let receipt = self
                .read("eth_getTransactionReceipt", move || {
                    self.client.get_transaction_receipt(hash)
                })
                .await?;
            if let Some(receipt) = receipt {
                let receipt = receipt_from(&receipt);
                debug!(block = receipt.block_number, success = receipt.success, "Receipt");
                return Ok(receipt);
            }
            if Instant::now() >= deadline {
                return Err(ChainError::ChainUnavailable(format!(
                    "no receipt for {tx_hash} after {:?}",
                    self.config.confirmation_timeout
                )));
            }
            tokio::time::sleep(self.config.receipt_poll_interval).await;
        }
    }
}
