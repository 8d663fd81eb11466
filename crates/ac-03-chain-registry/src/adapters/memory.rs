//! # In-Memory Chain and Registry
//!
//! Process-local stand-ins for a node and for the registry contract, used
//! by tests and by development runs without a chain. Both support fault
//! injection so callers can exercise their failure paths.

use crate::domain::config::DEFAULT_CHAIN_ID;
use crate::domain::transaction::{TxReceipt, TxRequest};
use crate::errors::ChainError;
use crate::ports::inbound::ContractRegistry;
use crate::ports::outbound::ChainClient;
use async_trait::async_trait;
use ethers::utils::keccak256;
use parking_lot::Mutex;
use shared_types::{Address, ContentId, ContractRecord, ContractState, TxHash};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

// =============================================================================
// CHAIN
// =============================================================================

#[derive(Default)]
struct ChainState {
    nonce: u64,
    code: HashMap<Address, Vec<u8>>,
    receipts: HashMap<TxHash, TxReceipt>,
    call_responses: HashMap<Address, Vec<u8>>,
    deploy_empty_code: bool,
    revert_next: Option<Option<String>>,
    replay_revert: Option<Option<String>>,
    last_creation: Option<Vec<u8>>,
    last_call: Option<(Address, Vec<u8>)>,
    offline: bool,
}

/// A chain that mines every transaction instantly.
#[derive(Default)]
pub struct InMemoryChain {
    state: Mutex<ChainState>,
}

impl InMemoryChain {
    /// Account used as `sender()`.
    pub const SENDER: Address = Address([0xaa; 20]);

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make creations succeed without leaving code behind.
    pub fn set_deploy_empty_code(&self, empty: bool) {
        self.state.lock().deploy_empty_code = empty;
    }

    /// Mine the next transaction with status 0; the reason is returned by
    /// the follow-up replay call.
    pub fn revert_next_transaction(&self, reason: Option<&str>) {
        self.state.lock().revert_next = Some(reason.map(str::to_string));
    }

    /// Fix the return data of `eth_call` against `to`.
    pub fn set_call_response(&self, to: Address, data: Vec<u8>) {
        self.state.lock().call_responses.insert(to, data);
    }

    pub fn set_offline(&self, offline: bool) {
        self.state.lock().offline = offline;
    }

    /// Init code of the most recent creation.
    #[must_use]
    pub fn last_creation(&self) -> Option<Vec<u8>> {
        self.state.lock().last_creation.clone()
    }

    /// Target and call data of the most recent non-creation transaction.
    #[must_use]
    pub fn last_call_transaction(&self) -> Option<(Address, Vec<u8>)> {
        self.state.lock().last_call.clone()
    }
}

fn unavailable() -> ChainError {
    ChainError::ChainUnavailable("in-memory chain offline".into())
}

#[async_trait]
impl ChainClient for InMemoryChain {
    fn chain_id(&self) -> u64 {
        DEFAULT_CHAIN_ID
    }

    fn sender(&self) -> Address {
        Self::SENDER
    }

    async fn get_code(&self, address: Address) -> Result<Vec<u8>, ChainError> {
        let state = self.state.lock();
        if state.offline {
            return Err(unavailable());
        }
        Ok(state.code.get(&address).cloned().unwrap_or_default())
    }

    async fn call(&self, to: Address, _data: Vec<u8>) -> Result<Vec<u8>, ChainError> {
        let mut state = self.state.lock();
        if state.offline {
            return Err(unavailable());
        }
        if let Some(Some(reason)) = state.replay_revert.take() {
            return Err(ChainError::TransactionReverted {
                tx_hash: None,
                reason: Some(reason),
            });
        }
        Ok(state.call_responses.get(&to).cloned().unwrap_or_default())
    }

    async fn send_transaction(&self, tx: TxRequest) -> Result<TxHash, ChainError> {
        let mut state = self.state.lock();
        if state.offline {
            return Err(unavailable());
        }
        state.nonce += 1;
        let mut preimage = state.nonce.to_be_bytes().to_vec();
        preimage.extend_from_slice(&tx.data);
        let tx_hash = TxHash(keccak256(&preimage));
        let gas_used = 21_000 + 16 * tx.data.len() as u64;

        let block_number = state.nonce;

        if let Some(reason) = state.revert_next.take() {
            state.replay_revert = Some(reason);
            state.receipts.insert(
                tx_hash,
                TxReceipt {
                    tx_hash,
                    success: false,
                    contract_address: None,
                    gas_used,
                    block_number,
                },
            );
            return Ok(tx_hash);
        }

        let contract_address = match tx.to {
            None => {
                let mut seed = Self::SENDER.as_bytes().to_vec();
                seed.extend_from_slice(&state.nonce.to_be_bytes());
                let address = Address::from_word(&keccak256(&seed));
                let code = if state.deploy_empty_code {
                    Vec::new()
                } else {
                    tx.data.clone()
                };
                state.code.insert(address, code);
                state.last_creation = Some(tx.data);
                Some(address)
            }
            Some(to) => {
                state.last_call = Some((to, tx.data));
                None
            }
        };

        state.receipts.insert(
            tx_hash,
            TxReceipt {
                tx_hash,
                success: true,
                contract_address,
                gas_used,
                block_number,
            },
        );
        Ok(tx_hash)
    }

    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<TxReceipt, ChainError> {
        self.state
            .lock()
            .receipts
            .get(&tx_hash)
            .cloned()
            .ok_or_else(|| ChainError::InvalidResponse(format!("unknown transaction {tx_hash}")))
    }
}

// =============================================================================
// REGISTRY
// =============================================================================

/// One recorded `update_state` write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateWrite {
    pub address: Address,
    pub state: ContractState,
    pub content_id: ContentId,
}

#[derive(Default)]
struct RegistryState {
    order: Vec<Address>,
    records: HashMap<Address, (ContractState, ContentId)>,
    writes: Vec<StateWrite>,
    unreadable: HashSet<Address>,
    add_calls: usize,
}

/// Registry contract semantics without a chain.
///
/// Unknown addresses read as `(Active, "")`, the zero value of the
/// contract's mapping.
#[derive(Default)]
pub struct InMemoryRegistry {
    state: Mutex<RegistryState>,
    tx_counter: AtomicU64,
    offline: AtomicBool,
    failing_updates: AtomicUsize,
    lost_update_acks: AtomicUsize,
}

impl InMemoryRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a registered entry without recording a write.
    pub fn seed(&self, address: Address, state: ContractState, content_id: ContentId) {
        let mut inner = self.state.lock();
        if !inner.records.contains_key(&address) {
            inner.order.push(address);
        }
        inner.records.insert(address, (state, content_id));
    }

    /// Every successful `update_state`, oldest first.
    #[must_use]
    pub fn writes(&self) -> Vec<StateWrite> {
        self.state.lock().writes.clone()
    }

    /// Fail every call with `ChainUnavailable`.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Fail the next `count` `update_state` calls with `ChainUnavailable`.
    pub fn fail_next_updates(&self, count: usize) {
        self.failing_updates.store(count, Ordering::SeqCst);
    }

    /// Apply the next `count` `update_state` calls but report
    /// `ChainUnavailable`, as when the receipt never reaches the caller.
    pub fn lose_next_update_acks(&self, count: usize) {
        self.lost_update_acks.store(count, Ordering::SeqCst);
    }

    /// Fail `get_state` for `address` with `ChainUnavailable`.
    pub fn fail_reads_for(&self, address: Address) {
        self.state.lock().unreadable.insert(address);
    }

    /// Number of `add_contract` calls that reached the registry.
    #[must_use]
    pub fn add_contract_calls(&self) -> usize {
        self.state.lock().add_calls
    }

    fn check_online(&self) -> Result<(), ChainError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(ChainError::ChainUnavailable("registry offline".into()));
        }
        Ok(())
    }

    fn next_tx_hash(&self) -> TxHash {
        let n = self.tx_counter.fetch_add(1, Ordering::SeqCst);
        TxHash(keccak256(&n.to_be_bytes()))
    }
}

#[async_trait]
impl ContractRegistry for InMemoryRegistry {
    async fn add_contract(&self, address: Address) -> Result<TxHash, ChainError> {
        self.check_online()?;
        let mut inner = self.state.lock();
        inner.add_calls += 1;
        if inner.order.contains(&address) {
            return Err(ChainError::TransactionReverted {
                tx_hash: None,
                reason: Some("contract already registered".into()),
            });
        }
        inner.order.push(address);
        inner
            .records
            .insert(address, (ContractState::Active, ContentId::empty()));
        Ok(self.next_tx_hash())
    }

    async fn update_state(
        &self,
        address: Address,
        state: ContractState,
        content_id: &ContentId,
    ) -> Result<TxHash, ChainError> {
        self.check_online()?;
        let failed = self
            .failing_updates
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failed {
            return Err(ChainError::ChainUnavailable("injected update failure".into()));
        }
        {
            let mut inner = self.state.lock();
            inner.records.insert(address, (state, content_id.clone()));
            inner.writes.push(StateWrite {
                address,
                state,
                content_id: content_id.clone(),
            });
        }
        let ack_lost = self
            .lost_update_acks
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if ack_lost {
            return Err(ChainError::ChainUnavailable("receipt not received".into()));
        }
        Ok(self.next_tx_hash())
    }

    async fn get_state(&self, address: Address) -> Result<ContractRecord, ChainError> {
        self.check_online()?;
        let inner = self.state.lock();
        if inner.unreadable.contains(&address) {
            return Err(ChainError::ChainUnavailable(format!("state of {address} unreadable")));
        }
        let (state, content_id) = inner
            .records
            .get(&address)
            .cloned()
            .unwrap_or((ContractState::Active, ContentId::empty()));
        Ok(ContractRecord {
            address,
            state,
            content_id,
        })
    }

    async fn get_all_addresses(&self) -> Result<Vec<Address>, ChainError> {
        self.check_online()?;
        Ok(self.state.lock().order.clone())
    }
}
