use std::fmt;

use ethers_core::types::U64;
use num_bigint::BigUint;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Hex account address exactly as the node reports it.
///
/// Equality is plain string equality; no checksum or case normalization is applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Address {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for Address {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub hash: String,
    pub from: Address,
    /// `None` marks a contract creation.
    #[serde(default, deserialize_with = "non_empty_address")]
    pub to: Option<Address>,
    #[serde(
        rename = "contractAddress",
        default,
        deserialize_with = "non_empty_address",
        skip_serializing_if = "Option::is_none"
    )]
    pub contract_address: Option<Address>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub number: U64,
    #[serde(default)]
    pub hash: Option<String>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

/// One entry of a `callTracer` frame's `calls` list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceCall {
    pub to: Address,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionTrace {
    /// Absent when the node returns a frame without a call list.
    #[serde(default)]
    pub calls: Option<Vec<TraceCall>>,
}

/// Account balance in wei. Arbitrary precision.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Balance(BigUint);

impl Balance {
    /// Parses an `eth_getBalance` quantity. The `0x` prefix is optional; an empty
    /// or non-hex digit string is rejected.
    pub fn from_hex(raw: &str) -> Option<Self> {
        let digits = raw
            .strip_prefix("0x")
            .or_else(|| raw.strip_prefix("0X"))
            .unwrap_or(raw);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        BigUint::parse_bytes(digits.as_bytes(), 16).map(Self)
    }

    pub fn as_biguint(&self) -> &BigUint {
        &self.0
    }
}

impl From<u64> for Balance {
    fn from(value: u64) -> Self {
        Self(BigUint::from(value))
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Decimal string: wei amounts overflow JSON number precision.
impl Serialize for Balance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedEntry<V> {
    pub address: Address,
    pub value: V,
}

fn non_empty_address<'de, D>(deserializer: D) -> Result<Option<Address>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.is_empty()).map(Address::from))
}
