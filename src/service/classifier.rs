use std::collections::HashMap;

use crate::{
    ledger::{BlockTag, LedgerClient, LedgerError},
    models::Address,
};

/// Tells contracts apart from externally-owned accounts by their deployed code.
///
/// Successful answers are memoized for the lifetime of the classifier, which is
/// one aggregation. Failures are not cached.
pub struct AddressClassifier<'a> {
    ledger: &'a dyn LedgerClient,
    known: HashMap<Address, bool>,
}

impl<'a> AddressClassifier<'a> {
    pub fn new(ledger: &'a dyn LedgerClient) -> Self {
        Self {
            ledger,
            known: HashMap::new(),
        }
    }

    pub async fn is_contract(&mut self, address: &Address) -> Result<bool, LedgerError> {
        if let Some(&cached) = self.known.get(address) {
            return Ok(cached);
        }
        let code = self.ledger.code(address, BlockTag::Latest).await?;
        let is_contract = has_code(&code);
        self.known.insert(address.clone(), is_contract);
        Ok(is_contract)
    }
}

fn has_code(code: &str) -> bool {
    let body = code.strip_prefix("0x").unwrap_or(code);
    !body.is_empty()
}
