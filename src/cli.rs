use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "onchain-stats", version, about = "Contract and wallet rankings over EVM blocks")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rank contracts by interactions (direct and traced) in a block range
    SmartContracts {
        #[arg(long)]
        start: u64,
        #[arg(long)]
        end: u64,
    },
    /// Rank wallets active in a block by their balance at that block
    RichestUsers {
        #[arg(long)]
        block: u64,
        /// Only print the top N wallets
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Run the HTTP API server
    Serve {
        /// Override bind address, e.g. 0.0.0.0:8080
        #[arg(long)]
        addr: Option<String>,
    },
}
