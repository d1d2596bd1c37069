//! Block-range aggregation: contract interaction counts and wallet balance rankings.

pub mod balances;
pub mod classifier;
pub mod interactions;
pub mod rank;
pub mod wallets;

use std::sync::Arc;

use crate::{
    ledger::{BlockTag, LedgerClient, LedgerError},
    models::{Balance, RankedEntry},
};

pub use balances::{fetch_balances, BalanceFetchOptions};
pub use classifier::AddressClassifier;
pub use interactions::{extract_contract_interactions, MissingTraceCalls};
pub use rank::rank;
pub use wallets::extract_wallets;

#[derive(Debug, Clone, Default)]
pub struct AggregationOptions {
    pub balances: BalanceFetchOptions,
    pub missing_trace_calls: MissingTraceCalls,
}

/// Runs aggregations against one ledger.
///
/// Each call gets a fresh classifier, so nothing learned about an address
/// outlives the request that learned it.
#[derive(Clone)]
pub struct Aggregator {
    ledger: Arc<dyn LedgerClient>,
    options: AggregationOptions,
}

impl Aggregator {
    pub fn new(ledger: Arc<dyn LedgerClient>, options: AggregationOptions) -> Self {
        Self { ledger, options }
    }

    pub fn ledger(&self) -> &Arc<dyn LedgerClient> {
        &self.ledger
    }

    /// Contracts in `start..=end` ranked by interaction count.
    pub async fn contract_interactions(
        &self,
        start: u64,
        end: u64,
    ) -> Result<Vec<RankedEntry<u64>>, LedgerError> {
        let blocks = self.ledger.blocks_in_range(start, end).await?;
        let mut classifier = AddressClassifier::new(self.ledger.as_ref());
        let counts = extract_contract_interactions(
            self.ledger.as_ref(),
            &mut classifier,
            &blocks,
            self.options.missing_trace_calls,
        )
        .await?;

        tracing::info!(
            start,
            end,
            blocks = blocks.len(),
            contracts = counts.len(),
            "counted contract interactions"
        );
        Ok(rank(counts))
    }

    /// Wallets active in `block`, ranked by their balance as of that block.
    pub async fn richest_wallets(&self, block: u64) -> Result<Vec<RankedEntry<Balance>>, LedgerError> {
        let blocks = self.ledger.blocks_in_range(block, block).await?;
        let wallets = {
            let mut classifier = AddressClassifier::new(self.ledger.as_ref());
            extract_wallets(&mut classifier, &blocks).await
        };
        let requested = wallets.len();
        let balances = fetch_balances(
            Arc::clone(&self.ledger),
            wallets,
            BlockTag::Number(block),
            &self.options.balances,
        )
        .await;

        tracing::info!(
            block,
            wallets = requested,
            ranked = balances.len(),
            "ranked wallets by balance"
        );
        Ok(rank(balances))
    }
}
