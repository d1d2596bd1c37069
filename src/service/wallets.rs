use std::collections::HashSet;

use crate::{
    aggregation_stats::AGGREGATION_STATS,
    models::{Address, Block},
};

use super::classifier::AddressClassifier;

/// Collects the externally-owned accounts seen in `blocks`.
///
/// Senders are taken as-is. Receivers are kept only when classified as EOAs; a
/// receiver whose classification fails is left out and the scan continues.
pub async fn extract_wallets(
    classifier: &mut AddressClassifier<'_>,
    blocks: &[Block],
) -> HashSet<Address> {
    let mut wallets = HashSet::new();

    for block in blocks {
        AGGREGATION_STATS.inc_blocks_scanned(1);
        AGGREGATION_STATS.inc_transactions_scanned(block.transactions.len() as u64);

        for tx in &block.transactions {
            wallets.insert(tx.from.clone());

            let Some(to) = tx.to.as_ref().filter(|addr| !addr.is_empty()) else {
                continue;
            };
            match classifier.is_contract(to).await {
                Ok(false) => {
                    wallets.insert(to.clone());
                }
                Ok(true) => {}
                Err(err) => {
                    AGGREGATION_STATS.inc_classification_failures(1);
                    tracing::warn!(address = %to, "skipping receiver, classification failed: {}", err);
                }
            }
        }
    }

    wallets
}
