use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use ethers_core::types::U64;
use ethers_providers::{Http, Provider};
use serde_json::json;
use url::Url;

use crate::{
    ledger::{BlockTag, LedgerClient, LedgerError},
    models::{Address, Block, TransactionTrace},
};

/// JSON-RPC client for an EVM node.
#[derive(Clone)]
pub struct EthClient {
    provider: Provider<Http>,
}

impl EthClient {
    pub fn new(rpc_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .no_proxy()
            .timeout(timeout)
            .build()
            .context("failed to build reqwest client")?;
        let url = Url::parse(rpc_url).context("invalid ETH_RPC_URL")?;
        let transport = Http::new_with_client(url, client);
        let provider = Provider::new(transport);
        Ok(Self { provider })
    }
}

#[async_trait]
impl LedgerClient for EthClient {
    async fn block_number(&self) -> Result<u64, LedgerError> {
        let number: U64 = self
            .provider
            .request("eth_blockNumber", ())
            .await
            .map_err(|e| LedgerError::upstream("eth_blockNumber", e))?;
        Ok(number.as_u64())
    }

    async fn block(&self, tag: BlockTag) -> Result<Block, LedgerError> {
        let block: Option<Block> = self
            .provider
            .request("eth_getBlockByNumber", (tag, true))
            .await
            .map_err(|e| LedgerError::upstream("eth_getBlockByNumber", e))?;
        block.ok_or_else(|| LedgerError::NotFound {
            what: format!("block {}", tag),
        })
    }

    async fn code(&self, address: &Address, tag: BlockTag) -> Result<String, LedgerError> {
        self.provider
            .request("eth_getCode", (address, tag))
            .await
            .map_err(|e| LedgerError::upstream("eth_getCode", e))
    }

    async fn balance(&self, address: &Address, tag: BlockTag) -> Result<String, LedgerError> {
        self.provider
            .request("eth_getBalance", (address, tag))
            .await
            .map_err(|e| LedgerError::upstream("eth_getBalance", e))
    }

    async fn transaction_trace(&self, tx_hash: &str) -> Result<TransactionTrace, LedgerError> {
        let trace: Option<TransactionTrace> = self
            .provider
            .request(
                "debug_traceTransaction",
                (tx_hash, json!({ "tracer": "callTracer" })),
            )
            .await
            .map_err(|e| LedgerError::upstream("debug_traceTransaction", e))?;
        trace.ok_or_else(|| LedgerError::NotFound {
            what: format!("trace for {}", tx_hash),
        })
    }

    async fn accounts(&self) -> Result<Vec<Address>, LedgerError> {
        self.provider
            .request("eth_accounts", ())
            .await
            .map_err(|e| LedgerError::upstream("eth_accounts", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_rpc_url() {
        assert!(EthClient::new("not a url", Duration::from_secs(1)).is_err());
    }

    #[test]
    fn accepts_http_rpc_url() {
        assert!(EthClient::new("http://localhost:8545", Duration::from_secs(1)).is_ok());
    }

    #[test]
    fn block_request_params_match_rpc_shape() {
        let params = serde_json::to_value((BlockTag::Number(100), true)).unwrap();
        assert_eq!(params, json!(["0x64", true]));

        let addr = Address::from("0xabc");
        let params = serde_json::to_value((&addr, BlockTag::Latest)).unwrap();
        assert_eq!(params, json!(["0xabc", "latest"]));
    }
}
