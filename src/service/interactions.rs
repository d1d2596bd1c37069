use std::collections::HashMap;

use crate::{
    aggregation_stats::AGGREGATION_STATS,
    ledger::{LedgerClient, LedgerError},
    models::{Address, Block},
};

use super::classifier::AddressClassifier;

/// What to do with a trace that carries no call list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingTraceCalls {
    #[default]
    Fail,
    TreatAsEmpty,
}

/// Counts interactions per contract across `blocks`.
///
/// Each transaction contributes one direct interaction (to the created contract,
/// or to `to` when it holds code) plus one per entry in its trace's top-level
/// call list. The first ledger error aborts the whole count.
pub async fn extract_contract_interactions(
    ledger: &dyn LedgerClient,
    classifier: &mut AddressClassifier<'_>,
    blocks: &[Block],
    missing_calls: MissingTraceCalls,
) -> Result<HashMap<Address, u64>, LedgerError> {
    let mut interactions: HashMap<Address, u64> = HashMap::new();

    for block in blocks {
        AGGREGATION_STATS.inc_blocks_scanned(1);
        AGGREGATION_STATS.inc_transactions_scanned(block.transactions.len() as u64);

        for tx in &block.transactions {
            match &tx.to {
                None => {
                    if let Some(created) = &tx.contract_address {
                        *interactions.entry(created.clone()).or_default() += 1;
                    }
                }
                Some(to) => {
                    if classifier.is_contract(to).await? {
                        *interactions.entry(to.clone()).or_default() += 1;
                    }
                }
            }

            let trace = ledger.transaction_trace(&tx.hash).await?;
            AGGREGATION_STATS.inc_traces_fetched(1);
            let calls = match (trace.calls, missing_calls) {
                (Some(calls), _) => calls,
                (None, MissingTraceCalls::TreatAsEmpty) => Vec::new(),
                (None, MissingTraceCalls::Fail) => {
                    return Err(LedgerError::MissingTraceCalls {
                        tx_hash: tx.hash.clone(),
                    })
                }
            };
            for call in calls {
                *interactions.entry(call.to).or_default() += 1;
            }
        }
    }

    Ok(interactions)
}
