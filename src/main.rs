mod cli;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use onchain_stats::{
    api::{self, AppState},
    config::Config,
    eth::EthClient,
    service::Aggregator,
};

use crate::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let config = Config::from_env().context("failed to load configuration")?;

    let client = EthClient::new(&config.eth_rpc_url, config.rpc_timeout)?;
    let aggregator = Aggregator::new(Arc::new(client), config.aggregation_options());

    match cli.command {
        Commands::Serve { addr } => {
            let bind = addr.unwrap_or_else(|| config.http_bind_addr.clone());
            let state = AppState {
                aggregator,
                max_block_range: config.max_block_range,
            };
            api::run_http_server(&bind, state).await?;
        }
        Commands::SmartContracts { start, end } => {
            let ranked = aggregator
                .contract_interactions(start, end)
                .await
                .with_context(|| format!("failed to rank contracts in blocks {}..={}", start, end))?;
            println!("{}", serde_json::to_string_pretty(&ranked)?);
        }
        Commands::RichestUsers { block, limit } => {
            let mut ranked = aggregator
                .richest_wallets(block)
                .await
                .with_context(|| format!("failed to rank wallets at block {}", block))?;
            if let Some(limit) = limit {
                ranked.truncate(limit);
            }
            println!("{}", serde_json::to_string_pretty(&ranked)?);
        }
    }

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}
