//! # Core Domain Entities
//!
//! ## Clusters
//!
//! - **Identity**: `Address`, `TxHash`, `ContentId`
//! - **Lifecycle**: `ContractState`, `ContractRecord`
//! - **Build output**: `ContractArtifact`

use crate::errors::{ParseError, UnknownContractState};
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// HEX HELPERS
// =============================================================================

/// Encode bytes as a `0x`-prefixed lowercase hex string.
#[must_use]
pub fn to_hex_prefixed(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Decode a hex string, with or without a `0x` prefix.
///
/// An empty string (or a bare `0x`) decodes to an empty vector.
pub fn decode_hex(input: &str) -> Result<Vec<u8>, ParseError> {
    let trimmed = input.trim();
    let stripped = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    hex::decode(stripped).map_err(|e| ParseError::InvalidHex(e.to_string()))
}

fn decode_fixed<const N: usize>(input: &str) -> Result<[u8; N], ParseError> {
    let bytes = decode_hex(input)?;
    if bytes.len() != N {
        return Err(ParseError::InvalidLength {
            expected: N,
            actual: bytes.len(),
        });
    }
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes);
    Ok(out)
}

// =============================================================================
// IDENTITY
// =============================================================================

/// A 20-byte Ethereum-style account or contract address.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, SerializeDisplay,
    DeserializeFromStr,
)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// The zero address.
    pub const ZERO: Self = Self([0u8; 20]);

    /// Raw bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Build from the last 20 bytes of a 32-byte word (ABI / keccak layout).
    #[must_use]
    pub fn from_word(word: &[u8; 32]) -> Self {
        let mut out = [0u8; 20];
        out.copy_from_slice(&word[12..]);
        Self(out)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&to_hex_prefixed(&self.0))
    }
}

impl FromStr for Address {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_fixed::<20>(s).map(Self)
    }
}

/// A 32-byte transaction hash.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, SerializeDisplay, DeserializeFromStr,
)]
pub struct TxHash(pub [u8; 32]);

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&to_hex_prefixed(&self.0))
    }
}

impl FromStr for TxHash {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_fixed::<32>(s).map(Self)
    }
}

/// Opaque reference to a blob in the content-addressed store.
///
/// Treated as an address, never as parseable structure. The empty id is the
/// registry's representation of "no archived content".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentId(String);

impl ContentId {
    /// Wrap a raw identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The empty identifier.
    #[must_use]
    pub fn empty() -> Self {
        Self(String::new())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ContentId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ContentId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

// =============================================================================
// LIFECYCLE
// =============================================================================

/// Lifecycle state of a registered contract.
///
/// Stored on-chain as a `uint8`:
///
/// | Value | State |
/// |-------|-------|
/// | 0 | `Active` |
/// | 1 | `Pending` |
/// | 2 | `Archived` |
///
/// Transitions only move forward: `Active -> Pending -> Archived`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ContractState {
    Active,
    Pending,
    Archived,
}

impl ContractState {
    /// All states in lifecycle order.
    pub const ALL: [ContractState; 3] = [Self::Active, Self::Pending, Self::Archived];

    /// On-chain discriminant.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        match self {
            Self::Active => 0,
            Self::Pending => 1,
            Self::Archived => 2,
        }
    }

    /// Display name used on the HTTP surface.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Pending => "Pending",
            Self::Archived => "Archived",
        }
    }

    /// The single forward successor of this state, if any.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Active => Some(Self::Pending),
            Self::Pending => Some(Self::Archived),
            Self::Archived => None,
        }
    }

    /// Whether `self -> target` is a legal lifecycle step.
    #[must_use]
    pub fn can_transition_to(self, target: Self) -> bool {
        self.next() == Some(target)
    }
}

impl TryFrom<u8> for ContractState {
    type Error = UnknownContractState;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Active),
            1 => Ok(Self::Pending),
            2 => Ok(Self::Archived),
            other => Err(UnknownContractState(other)),
        }
    }
}

impl From<ContractState> for u8 {
    fn from(state: ContractState) -> Self {
        state.as_u8()
    }
}

impl fmt::Display for ContractState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ContractState {
    type Err = ParseError;

    /// Accepts state names (case-insensitive) or the on-chain digits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(raw) = trimmed.parse::<u8>() {
            return Self::try_from(raw).map_err(|_| ParseError::UnknownState(s.to_string()));
        }
        Self::ALL
            .into_iter()
            .find(|state| state.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseError::UnknownState(s.to_string()))
    }
}

/// A registry entry as read from the chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractRecord {
    #[serde(rename = "contractAddress")]
    pub address: Address,
    pub state: ContractState,
    pub content_id: ContentId,
}

// =============================================================================
// BUILD OUTPUT
// =============================================================================

/// Compiled output of one source file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractArtifact {
    /// Contract name extracted from the source.
    pub name: String,
    /// JSON ABI as emitted by the toolchain.
    pub abi: serde_json::Value,
    /// Creation bytecode.
    #[serde(with = "hex_bytes")]
    pub bytecode: Vec<u8>,
}

mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::to_hex_prefixed(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::decode_hex(&raw).map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_address_parse_and_display() {
        let addr: Address = "0x00000000000000000000000000000000000000Ab".parse().unwrap();
        assert_eq!(addr.0[19], 0xab);
        assert_eq!(
            addr.to_string(),
            "0x00000000000000000000000000000000000000ab"
        );
    }

    #[test]
    fn test_address_rejects_wrong_length() {
        let err = "0x1234".parse::<Address>().unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidLength {
                expected: 20,
                actual: 2
            }
        );
        assert!(matches!(
            "0xzz".parse::<Address>(),
            Err(ParseError::InvalidHex(_))
        ));
    }

    #[test]
    fn test_address_serde_as_hex_string() {
        let addr = Address([0x11; 20]);
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, format!("\"0x{}\"", "11".repeat(20)));
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, addr);
    }

    #[test]
    fn test_state_mapping_is_exhaustive() {
        assert_eq!(ContractState::try_from(0), Ok(ContractState::Active));
        assert_eq!(ContractState::try_from(1), Ok(ContractState::Pending));
        assert_eq!(ContractState::try_from(2), Ok(ContractState::Archived));
        assert_eq!(ContractState::try_from(3), Err(UnknownContractState(3)));
    }

    #[test]
    fn test_state_transitions_only_move_forward() {
        use ContractState::*;
        assert!(Active.can_transition_to(Pending));
        assert!(Pending.can_transition_to(Archived));
        assert!(!Active.can_transition_to(Archived));
        assert!(!Pending.can_transition_to(Active));
        assert!(!Archived.can_transition_to(Active));
        assert!(!Archived.can_transition_to(Archived));
    }

    #[test]
    fn test_state_from_str() {
        assert_eq!("archived".parse(), Ok(ContractState::Archived));
        assert_eq!("Pending".parse(), Ok(ContractState::Pending));
        assert_eq!("0".parse(), Ok(ContractState::Active));
        assert!("7".parse::<ContractState>().is_err());
        assert!("Deleted".parse::<ContractState>().is_err());
    }

    #[test]
    fn test_artifact_bytecode_serde() {
        let artifact = ContractArtifact {
            name: "Foo".into(),
            abi: serde_json::json!([]),
            bytecode: vec![0x60, 0x80],
        };
        let json = serde_json::to_value(&artifact).unwrap();
        assert_eq!(json["bytecode"], "0x6080");
        let back: ContractArtifact = serde_json::from_value(json).unwrap();
        assert_eq!(back, artifact);
    }

    proptest! {
        #[test]
        fn prop_state_decoding_never_escapes_known_states(raw in any::<u8>()) {
            match ContractState::try_from(raw) {
                Ok(state) => prop_assert_eq!(state.as_u8(), raw),
                Err(UnknownContractState(v)) => prop_assert!(v > 2),
            }
        }
    }
}
