//! Registry contract gateway.

use crate::domain::config::{RegistryConfig, RegistryFunctions};
use crate::domain::encoding::{from_h160, to_h160};
use crate::domain::transaction::TxRequest;
use crate::errors::ChainError;
use crate::ports::inbound::ContractRegistry;
use crate::ports::outbound::ChainClient;
use async_trait::async_trait;
use ethers::abi::{parse_abi, Function, ParamType, Token};
use ethers::types::U256;
use shared_types::{Address, ContentId, ContractRecord, ContractState, TxHash};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// The four registry functions, parsed from their declarations.
#[derive(Debug, Clone)]
struct RegistryAbi {
    add_contract: Function,
    update_state: Function,
    get_state: Function,
    get_all: Function,
}

impl RegistryAbi {
    fn parse(functions: &RegistryFunctions) -> Result<Self, ChainError> {
        let uint = ParamType::Uint(8);
        Ok(Self {
            add_contract: parse_function(&functions.add_contract, &[ParamType::Address], &[])?,
            update_state: parse_function(
                &functions.update_state,
                &[ParamType::Address, uint.clone(), ParamType::String],
                &[],
            )?,
            get_state: parse_function(
                &functions.get_state,
                &[ParamType::Address],
                &[uint, ParamType::String],
            )?,
            get_all: parse_function(
                &functions.get_all,
                &[],
                &[ParamType::Array(Box::new(ParamType::Address))],
            )?,
        })
    }
}

/// Parse one human-readable declaration and check it has the shape the
/// gateway encodes against. Integer widths are not compared.
fn parse_function(
    declaration: &str,
    inputs: &[ParamType],
    outputs: &[ParamType],
) -> Result<Function, ChainError> {
    let abi = parse_abi(&[declaration])
        .map_err(|e| ChainError::Config(format!("{declaration:?}: {e}")))?;
    let function = abi
        .functions()
        .next()
        .cloned()
        .ok_or_else(|| ChainError::Config(format!("{declaration:?} declares no function")))?;

    let input_kinds: Vec<_> = function.inputs.iter().map(|p| p.kind.clone()).collect();
    let output_kinds: Vec<_> = function.outputs.iter().map(|p| p.kind.clone()).collect();
    if !same_shape(&input_kinds, inputs) || !same_shape(&output_kinds, outputs) {
        return Err(ChainError::Config(format!(
            "{declaration:?} does not match the registry interface"
        )));
    }
    Ok(function)
}

fn same_shape(actual: &[ParamType], expected: &[ParamType]) -> bool {
    actual.len() == expected.len()
        && actual.iter().zip(expected).all(|pair| match pair {
            (ParamType::Uint(_), ParamType::Uint(_)) => true,
            (a, b) => a == b,
        })
}

/// Map the raw state word to a `ContractState`.
///
/// Anything outside the known discriminants is reported with its full
/// value rather than narrowed.
fn state_from_word(raw: U256) -> Result<ContractState, ChainError> {
    if raw > U256::from(u8::MAX) {
        return Err(ChainError::UnknownState(raw.to_string()));
    }
    let small = u8::try_from(raw.low_u32()).map_err(|_| ChainError::UnknownState(raw.to_string()))?;
    Ok(ContractState::try_from(small)?)
}

/// `ContractRegistry` over the configured registry contract.
pub struct RegistryGateway {
    chain: Arc<dyn ChainClient>,
    address: Address,
    abi: RegistryAbi,
}

impl RegistryGateway {
    /// Fails with `Config` when a function declaration does not parse or
    /// does not match the registry interface.
    pub fn new(chain: Arc<dyn ChainClient>, config: RegistryConfig) -> Result<Self, ChainError> {
        let abi = RegistryAbi::parse(&config.functions)?;
        Ok(Self {
            chain,
            address: config.address,
            abi,
        })
    }

    /// Address of the registry contract.
    #[must_use]
    pub fn address(&self) -> Address {
        self.address
    }

    async fn write(&self, function: &Function, args: &[Token]) -> Result<TxHash, ChainError> {
        let data = function.encode_input(args)?;
        let receipt = self
            .chain
            .transact(TxRequest::call(self.address, data))
            .await?;
        Ok(receipt.tx_hash)
    }

    async fn read(&self, function: &Function, args: &[Token]) -> Result<Vec<Token>, ChainError> {
        let data = self
            .chain
            .call(self.address, function.encode_input(args)?)
            .await?;
        Ok(function.decode_output(&data)?)
    }
}

fn unexpected(what: &str) -> ChainError {
    ChainError::InvalidResponse(format!("registry returned malformed {what}"))
}

#[async_trait]
impl ContractRegistry for RegistryGateway {
    #[instrument(skip(self), fields(%address))]
    async fn add_contract(&self, address: Address) -> Result<TxHash, ChainError> {
        let tx_hash = self
            .write(&self.abi.add_contract, &[Token::Address(to_h160(address))])
            .await?;
        info!(%tx_hash, "Contract registered");
        Ok(tx_hash)
    }

    #[instrument(skip(self), fields(%address, %state, content_id = %content_id))]
    async fn update_state(
        &self,
        address: Address,
        state: ContractState,
        content_id: &ContentId,
    ) -> Result<TxHash, ChainError> {
        let args = [
            Token::Address(to_h160(address)),
            Token::Uint(U256::from(state.as_u8())),
            Token::String(content_id.as_str().to_string()),
        ];
        let tx_hash = self.write(&self.abi.update_state, &args).await?;
        info!(%tx_hash, "Registry state updated");
        Ok(tx_hash)
    }

    #[instrument(skip(self), fields(%address))]
    async fn get_state(&self, address: Address) -> Result<ContractRecord, ChainError> {
        let mut tokens = self
            .read(&self.abi.get_state, &[Token::Address(to_h160(address))])
            .await?
            .into_iter();

        let raw = tokens
            .next()
            .and_then(Token::into_uint)
            .ok_or_else(|| unexpected("state"))?;
        let content_id = tokens
            .next()
            .and_then(Token::into_string)
            .ok_or_else(|| unexpected("content id"))?;

        let state = state_from_word(raw)?;
        debug!(%state, "Read registry state");
        Ok(ContractRecord {
            address,
            state,
            content_id: ContentId::new(content_id),
        })
    }

    #[instrument(skip(self))]
    async fn get_all_addresses(&self) -> Result<Vec<Address>, ChainError> {
        self.read(&self.abi.get_all, &[])
            .await?
            .into_iter()
            .next()
            .and_then(Token::into_array)
            .ok_or_else(|| unexpected("address list"))?
            .into_iter()
            .map(|token| {
                token
                    .into_address()
                    .map(from_h160)
                    .ok_or_else(|| unexpected("address"))
            })
            .collect()
    }
}
