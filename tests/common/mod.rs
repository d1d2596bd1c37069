#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use onchain_stats::ledger::{BlockTag, LedgerClient, LedgerError};
use onchain_stats::models::{Address, Block, TraceCall, Transaction, TransactionTrace};

/// In-memory ledger. Anything not configured behaves like an EOA with no traces.
#[derive(Default)]
pub struct MockLedger {
    pub blocks: HashMap<u64, Block>,
    pub contracts: HashSet<Address>,
    pub failing_code: HashSet<Address>,
    pub traces: HashMap<String, TransactionTrace>,
    pub failing_traces: HashSet<String>,
    pub balances: HashMap<Address, String>,
    pub hanging_balances: HashSet<Address>,
    pub balance_delay: Option<Duration>,
    pub accounts: Vec<Address>,
    pub code_calls: AtomicUsize,
    pub in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
    pub balance_tags: Mutex<Vec<BlockTag>>,
}

impl MockLedger {
    pub fn with_block(mut self, block: Block) -> Self {
        self.blocks.insert(block.number.as_u64(), block);
        self
    }

    pub fn with_contract(mut self, address: &str) -> Self {
        self.contracts.insert(Address::from(address));
        self
    }

    pub fn with_trace(mut self, tx_hash: &str, calls: &[&str]) -> Self {
        let calls = calls
            .iter()
            .map(|to| TraceCall {
                to: Address::from(*to),
            })
            .collect();
        self.traces.insert(
            tx_hash.to_string(),
            TransactionTrace { calls: Some(calls) },
        );
        self
    }

    pub fn with_trace_without_calls(mut self, tx_hash: &str) -> Self {
        self.traces
            .insert(tx_hash.to_string(), TransactionTrace { calls: None });
        self
    }

    pub fn with_balance(mut self, address: &str, hex: &str) -> Self {
        self.balances.insert(Address::from(address), hex.to_string());
        self
    }
}

#[async_trait]
impl LedgerClient for MockLedger {
    async fn block_number(&self) -> Result<u64, LedgerError> {
        Ok(self.blocks.keys().copied().max().unwrap_or(0))
    }

    async fn block(&self, tag: BlockTag) -> Result<Block, LedgerError> {
        let number = match tag {
            BlockTag::Number(n) => n,
            BlockTag::Latest => self.block_number().await?,
        };
        self.blocks
            .get(&number)
            .cloned()
            .ok_or_else(|| LedgerError::NotFound {
                what: format!("block {}", tag),
            })
    }

    async fn code(&self, address: &Address, _tag: BlockTag) -> Result<String, LedgerError> {
        self.code_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_code.contains(address) {
            return Err(LedgerError::upstream("eth_getCode", "connection reset"));
        }
        if self.contracts.contains(address) {
            Ok("0x6080604052".to_string())
        } else {
            Ok("0x".to_string())
        }
    }

    async fn balance(&self, address: &Address, tag: BlockTag) -> Result<String, LedgerError> {
        self.balance_tags.lock().unwrap().push(tag);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if self.hanging_balances.contains(address) {
            tokio::time::sleep(Duration::from_secs(30)).await;
        } else if let Some(delay) = self.balance_delay {
            tokio::time::sleep(delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.balances
            .get(address)
            .cloned()
            .ok_or_else(|| LedgerError::upstream("eth_getBalance", "no balance for account"))
    }

    async fn transaction_trace(&self, tx_hash: &str) -> Result<TransactionTrace, LedgerError> {
        if self.failing_traces.contains(tx_hash) {
            return Err(LedgerError::upstream("debug_traceTransaction", "tracer unavailable"));
        }
        Ok(self
            .traces
            .get(tx_hash)
            .cloned()
            .unwrap_or(TransactionTrace {
                calls: Some(Vec::new()),
            }))
    }

    async fn accounts(&self) -> Result<Vec<Address>, LedgerError> {
        Ok(self.accounts.clone())
    }
}

pub fn call(hash: &str, from: &str, to: &str) -> Transaction {
    Transaction {
        hash: hash.to_string(),
        from: Address::from(from),
        to: Some(Address::from(to)),
        contract_address: None,
    }
}

pub fn creation(hash: &str, from: &str, contract: &str) -> Transaction {
    Transaction {
        hash: hash.to_string(),
        from: Address::from(from),
        to: None,
        contract_address: Some(Address::from(contract)),
    }
}

pub fn block(number: u64, transactions: Vec<Transaction>) -> Block {
    Block {
        number: number.into(),
        hash: Some(format!("0x{:064x}", number)),
        transactions,
    }
}

pub fn addr(raw: &str) -> Address {
    Address::from(raw)
}
