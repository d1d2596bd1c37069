use std::env;
use std::time::Duration;

use crate::service::{
    balances::{DEFAULT_BALANCE_CONCURRENCY, DEFAULT_BALANCE_TIMEOUT},
    AggregationOptions, BalanceFetchOptions, MissingTraceCalls,
};

#[derive(Debug, Clone)]
pub struct Config {
    pub eth_rpc_url: String,
    pub http_bind_addr: String,
    pub rpc_timeout: Duration,
    pub balance_concurrency: usize,
    pub balance_fetch_timeout: Option<Duration>,
    pub missing_trace_calls: MissingTraceCalls,
    pub max_block_range: u64,
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("missing ETH_RPC_URL env var")]
    MissingEthRpcUrl,
    #[error("invalid {var}={value:?}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: &'static str,
    },
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| env::var(key).ok())
    }

    pub fn from_vars<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let eth_rpc_url = var("ETH_RPC_URL")
            .filter(|url| !url.trim().is_empty())
            .ok_or(ConfigError::MissingEthRpcUrl)?;
        let http_bind_addr = var("HTTP_BIND").unwrap_or_else(|| "127.0.0.1:8080".to_string());

        let rpc_timeout = Duration::from_secs(parse_positive(&var, "RPC_TIMEOUT_SECS", 30)?);

        let balance_concurrency =
            parse_positive(&var, "BALANCE_CONCURRENCY", DEFAULT_BALANCE_CONCURRENCY as u64)?;

        let balance_fetch_timeout = match parse_u64(
            &var,
            "BALANCE_FETCH_TIMEOUT_SECS",
            DEFAULT_BALANCE_TIMEOUT.as_secs(),
        )? {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };

        let missing_trace_calls = match var("MISSING_TRACE_CALLS") {
            None => MissingTraceCalls::default(),
            Some(raw) => parse_missing_trace_calls(&raw).ok_or(ConfigError::Invalid {
                var: "MISSING_TRACE_CALLS",
                value: raw,
                reason: "expected `fail` or `empty`",
            })?,
        };

        let max_block_range = parse_positive(&var, "MAX_BLOCK_RANGE", 1000)?;

        Ok(Self {
            eth_rpc_url,
            http_bind_addr,
            rpc_timeout,
            balance_concurrency: balance_concurrency as usize,
            balance_fetch_timeout,
            missing_trace_calls,
            max_block_range,
        })
    }

    pub fn aggregation_options(&self) -> AggregationOptions {
        AggregationOptions {
            balances: BalanceFetchOptions {
                concurrency: self.balance_concurrency,
                timeout: self.balance_fetch_timeout,
            },
            missing_trace_calls: self.missing_trace_calls,
        }
    }
}

fn parse_u64<F>(var: &F, key: &'static str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
            var: key,
            value: raw,
            reason: "expected a non-negative integer",
        }),
    }
}

fn parse_positive<F>(var: &F, key: &'static str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match parse_u64(var, key, default)? {
        0 => Err(ConfigError::Invalid {
            var: key,
            value: "0".to_string(),
            reason: "must be at least 1",
        }),
        n => Ok(n),
    }
}

fn parse_missing_trace_calls(raw: &str) -> Option<MissingTraceCalls> {
    match raw.trim().to_lowercase().as_str() {
        "fail" => Some(MissingTraceCalls::Fail),
        "empty" => Some(MissingTraceCalls::TreatAsEmpty),
        _ => None,
    }
}
