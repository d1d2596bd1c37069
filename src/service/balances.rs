use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::task::JoinSet;

use crate::{
    aggregation_stats::AGGREGATION_STATS,
    ledger::{BlockTag, LedgerClient, LedgerError},
    models::{Address, Balance},
};

pub const DEFAULT_BALANCE_CONCURRENCY: usize = 8;
pub const DEFAULT_BALANCE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct BalanceFetchOptions {
    /// Upper bound on balance requests in flight at once.
    pub concurrency: usize,
    /// Per-wallet deadline. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for BalanceFetchOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_BALANCE_CONCURRENCY,
            timeout: Some(DEFAULT_BALANCE_TIMEOUT),
        }
    }
}

#[derive(thiserror::Error, Debug)]
enum FetchFailure {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

/// Fetches the balance of every wallet at `tag`.
///
/// Wallets whose fetch fails, times out or returns an undecodable quantity are
/// left out of the result; the call itself never fails.
pub async fn fetch_balances(
    ledger: Arc<dyn LedgerClient>,
    wallets: HashSet<Address>,
    tag: BlockTag,
    options: &BalanceFetchOptions,
) -> HashMap<Address, Balance> {
    if wallets.is_empty() {
        return HashMap::new();
    }

    let total = wallets.len();
    let workers = options.concurrency.max(1).min(total);
    let queue = Arc::new(Mutex::new(wallets.into_iter().collect::<VecDeque<_>>()));

    let mut pool = JoinSet::new();
    for _ in 0..workers {
        let ledger = Arc::clone(&ledger);
        let queue = Arc::clone(&queue);
        let timeout = options.timeout;
        pool.spawn(async move {
            let mut fetched = Vec::new();
            while let Some(wallet) = next_wallet(&queue) {
                match fetch_one(ledger.as_ref(), &wallet, tag, timeout).await {
                    Ok(balance) => fetched.push((wallet, balance)),
                    Err(err) => {
                        AGGREGATION_STATS.inc_balances_dropped(1);
                        tracing::warn!(wallet = %wallet, "dropping wallet from ranking: {}", err);
                    }
                }
            }
            fetched
        });
    }

    let mut balances = HashMap::with_capacity(total);
    while let Some(joined) = pool.join_next().await {
        match joined {
            Ok(fetched) => balances.extend(fetched),
            Err(err) => tracing::warn!("balance worker did not finish: {}", err),
        }
    }

    tracing::debug!(
        requested = total,
        fetched = balances.len(),
        workers,
        "balance fetch complete"
    );
    balances
}

fn next_wallet(queue: &Mutex<VecDeque<Address>>) -> Option<Address> {
    queue
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .pop_front()
}

async fn fetch_one(
    ledger: &dyn LedgerClient,
    wallet: &Address,
    tag: BlockTag,
    timeout: Option<Duration>,
) -> Result<Balance, FetchFailure> {
    let raw = match timeout {
        Some(limit) => tokio::time::timeout(limit, ledger.balance(wallet, tag))
            .await
            .map_err(|_| FetchFailure::Timeout(limit))??,
        None => ledger.balance(wallet, tag).await?,
    };
    Balance::from_hex(&raw).ok_or_else(|| {
        FetchFailure::Ledger(LedgerError::Decode {
            what: "balance",
            reason: format!("{raw:?} is not a hex quantity"),
        })
    })
}
