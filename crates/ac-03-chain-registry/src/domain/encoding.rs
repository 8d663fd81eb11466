//! # Encoding Glue
//!
//! Bridges the workspace's plain byte types and JSON constructor arguments
//! to `ethers` ABI types. All ABI encoding itself is done by `ethers::abi`.

use crate::errors::ChainError;
use ethers::abi::token::{LenientTokenizer, Tokenizer};
use ethers::abi::{Abi, ParamType, Token};
use ethers::types::{H160, H256, U256};
use serde_json::Value;
use shared_types::{Address, TxHash};

/// Selector of the `Error(string)` revert payload.
pub const ERROR_STRING_SELECTOR: [u8; 4] = [0x08, 0xc3, 0x79, 0xa0];

#[must_use]
pub fn to_h160(address: Address) -> H160 {
    H160(address.0)
}

#[must_use]
pub fn from_h160(address: H160) -> Address {
    Address(address.0)
}

#[must_use]
pub fn to_h256(hash: TxHash) -> H256 {
    H256(hash.0)
}

#[must_use]
pub fn from_h256(hash: H256) -> TxHash {
    TxHash(hash.0)
}

/// Narrow a node quantity to `u64`, saturating.
#[must_use]
pub fn clamp_u64(value: U256) -> u64 {
    if value > U256::from(u64::MAX) {
        u64::MAX
    } else {
        value.as_u64()
    }
}

/// Human-readable reason of an `Error(string)` revert, if that is what
/// `data` carries.
#[must_use]
pub fn decode_revert_reason(data: &[u8]) -> Option<String> {
    if data.len() < 4 || data[..4] != ERROR_STRING_SELECTOR {
        return None;
    }
    match ethers::abi::decode(&[ParamType::String], &data[4..]).ok()?.pop()? {
        Token::String(reason) => Some(reason),
        _ => None,
    }
}

/// Encode `args` against the artifact's constructor and append them to
/// `bytecode`.
///
/// Arguments are JSON: numbers or decimal/hex strings for integers, hex
/// strings for addresses and bytes, and JSON arrays for arrays, fixed
/// arrays and tuples (tuple members in declaration order).
pub fn encode_deploy_data(
    abi: &Value,
    bytecode: &[u8],
    args: &[Value],
) -> Result<Vec<u8>, ChainError> {
    let abi: Abi = serde_json::from_value(abi.clone())
        .map_err(|e| ChainError::Abi(format!("invalid artifact abi: {e}")))?;

    let Some(constructor) = abi.constructor() else {
        if args.is_empty() {
            return Ok(bytecode.to_vec());
        }
        return Err(ChainError::Abi(format!(
            "contract has no constructor but {} arguments were given",
            args.len()
        )));
    };

    if constructor.inputs.len() != args.len() {
        return Err(ChainError::Abi(format!(
            "constructor takes {} arguments, got {}",
            constructor.inputs.len(),
            args.len()
        )));
    }

    let tokens = constructor
        .inputs
        .iter()
        .zip(args)
        .map(|(param, arg)| tokenize(&param.kind, arg))
        .collect::<Result<Vec<_>, _>>()?;

    constructor
        .encode_input(bytecode.to_vec(), &tokens)
        .map_err(|e| ChainError::Abi(e.to_string()))
}

/// Turn one JSON value into a token of type `kind`.
pub fn tokenize(kind: &ParamType, value: &Value) -> Result<Token, ChainError> {
    match (kind, value) {
        (ParamType::Array(inner), Value::Array(items)) => items
            .iter()
            .map(|item| tokenize(inner, item))
            .collect::<Result<_, _>>()
            .map(Token::Array),
        (ParamType::FixedArray(inner, len), Value::Array(items)) => {
            if items.len() != *len {
                return Err(ChainError::Abi(format!(
                    "{kind} expects {len} elements, got {}",
                    items.len()
                )));
            }
            items
                .iter()
                .map(|item| tokenize(inner, item))
                .collect::<Result<_, _>>()
                .map(Token::FixedArray)
        }
        (ParamType::Tuple(members), Value::Array(items)) => {
            if items.len() != members.len() {
                return Err(ChainError::Abi(format!(
                    "{kind} expects {} members, got {}",
                    members.len(),
                    items.len()
                )));
            }
            members
                .iter()
                .zip(items)
                .map(|(member, item)| tokenize(member, item))
                .collect::<Result<_, _>>()
                .map(Token::Tuple)
        }
        (_, Value::String(raw)) => lenient(kind, raw),
        (_, Value::Number(number)) => lenient(kind, &number.to_string()),
        (_, Value::Bool(flag)) => lenient(kind, &flag.to_string()),
        (_, other) => Err(ChainError::Abi(format!("cannot encode {other} as {kind}"))),
    }
}

fn lenient(kind: &ParamType, raw: &str) -> Result<Token, ChainError> {
    LenientTokenizer::tokenize(kind, raw)
        .map_err(|e| ChainError::Abi(format!("cannot encode {raw:?} as {kind}: {e}")))
}
