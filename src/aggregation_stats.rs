use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug)]
pub struct AggregationStats {
    blocks_scanned: AtomicU64,
    transactions_scanned: AtomicU64,
    traces_fetched: AtomicU64,
    classification_failures: AtomicU64,
    balances_dropped: AtomicU64,
}

impl Default for AggregationStats {
    fn default() -> Self {
        Self::new()
    }
}

impl AggregationStats {
    pub const fn new() -> Self {
        Self {
            blocks_scanned: AtomicU64::new(0),
            transactions_scanned: AtomicU64::new(0),
            traces_fetched: AtomicU64::new(0),
            classification_failures: AtomicU64::new(0),
            balances_dropped: AtomicU64::new(0),
        }
    }

    pub fn inc_blocks_scanned(&self, n: u64) {
        self.blocks_scanned.fetch_add(n, Ordering::Relaxed);
    }

    pub fn inc_transactions_scanned(&self, n: u64) {
        self.transactions_scanned.fetch_add(n, Ordering::Relaxed);
    }

    pub fn inc_traces_fetched(&self, n: u64) {
        self.traces_fetched.fetch_add(n, Ordering::Relaxed);
    }

    pub fn inc_classification_failures(&self, n: u64) {
        self.classification_failures.fetch_add(n, Ordering::Relaxed);
    }

    pub fn inc_balances_dropped(&self, n: u64) {
        self.balances_dropped.fetch_add(n, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> AggregationSnapshot {
        AggregationSnapshot {
            blocks_scanned: self.blocks_scanned.load(Ordering::Relaxed),
            transactions_scanned: self.transactions_scanned.load(Ordering::Relaxed),
            traces_fetched: self.traces_fetched.load(Ordering::Relaxed),
            classification_failures: self.classification_failures.load(Ordering::Relaxed),
            balances_dropped: self.balances_dropped.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct AggregationSnapshot {
    pub blocks_scanned: u64,
    pub transactions_scanned: u64,
    pub traces_fetched: u64,
    pub classification_failures: u64,
    pub balances_dropped: u64,
}

pub static AGGREGATION_STATS: AggregationStats = AggregationStats::new();
