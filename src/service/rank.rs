use std::collections::HashMap;

use crate::models::{Address, RankedEntry};

/// Orders by value, highest first. Equal values fall back to ascending address
/// so the output is stable across runs.
pub fn rank<V: Ord>(values: HashMap<Address, V>) -> Vec<RankedEntry<V>> {
    let mut ranked: Vec<RankedEntry<V>> = values
        .into_iter()
        .map(|(address, value)| RankedEntry { address, value })
        .collect();
    ranked.sort_by(|a, b| {
        b.value
            .cmp(&a.value)
            .then_with(|| a.address.cmp(&b.address))
    });
    ranked
}
