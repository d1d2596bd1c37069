use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use ethers_core::types::{BlockNumber, U64};
use serde::{Serialize, Serializer};

use crate::models::{Address, Block, TransactionTrace};

#[derive(thiserror::Error, Debug)]
pub enum LedgerError {
    #[error("{method} failed: {reason}")]
    Upstream { method: &'static str, reason: String },
    #[error("{what} not found")]
    NotFound { what: String },
    #[error("malformed {what}: {reason}")]
    Decode { what: &'static str, reason: String },
    #[error("trace for {tx_hash} has no call list")]
    MissingTraceCalls { tx_hash: String },
}

impl LedgerError {
    pub fn upstream(method: &'static str, reason: impl fmt::Display) -> Self {
        Self::Upstream {
            method,
            reason: reason.to_string(),
        }
    }
}

/// Block selector for state queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockTag {
    Latest,
    Number(u64),
}

impl fmt::Display for BlockTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockTag::Latest => f.write_str("latest"),
            BlockTag::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<BlockTag> for BlockNumber {
    fn from(tag: BlockTag) -> Self {
        match tag {
            BlockTag::Latest => BlockNumber::Latest,
            BlockTag::Number(n) => BlockNumber::Number(U64::from(n)),
        }
    }
}

// On the wire a tag is `"latest"` or a hex quantity.
impl Serialize for BlockTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        BlockNumber::from(*self).serialize(serializer)
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("invalid block tag {0:?}")]
pub struct ParseBlockTagError(pub String);

impl FromStr for BlockTag {
    type Err = ParseBlockTagError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case("latest") {
            return Ok(BlockTag::Latest);
        }
        let invalid = || ParseBlockTagError(raw.to_string());
        let number = match trimmed.strip_prefix("0x") {
            Some(hex) if !hex.is_empty() && hex.len() <= 16 => U64::from_str_radix(hex, 16)
                .map_err(|_| invalid())?
                .as_u64(),
            Some(_) => return Err(invalid()),
            None => trimmed.parse::<u64>().map_err(|_| invalid())?,
        };
        Ok(BlockTag::Number(number))
    }
}

/// Read access to a node's chain data.
///
/// Every aggregation receives its client explicitly; implementations must be
/// shareable across the balance worker tasks.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    async fn block_number(&self) -> Result<u64, LedgerError>;

    async fn block(&self, tag: BlockTag) -> Result<Block, LedgerError>;

    /// Inclusive range, ascending. `start > end` is an empty range.
    async fn blocks_in_range(&self, start: u64, end: u64) -> Result<Vec<Block>, LedgerError> {
        let mut blocks = Vec::new();
        for number in start..=end {
            let block = self.block(BlockTag::Number(number)).await?;
            tracing::debug!(
                block = number,
                transactions = block.transactions.len(),
                "fetched block"
            );
            blocks.push(block);
        }
        Ok(blocks)
    }

    async fn code(&self, address: &Address, tag: BlockTag) -> Result<String, LedgerError>;

    async fn balance(&self, address: &Address, tag: BlockTag) -> Result<String, LedgerError>;

    async fn transaction_trace(&self, tx_hash: &str) -> Result<TransactionTrace, LedgerError>;

    async fn accounts(&self) -> Result<Vec<Address>, LedgerError>;
}
