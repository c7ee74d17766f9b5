//! Command-line status viewer for a campaign contract.
//!
//! Read-only: builds the HTTP chain reader and the query service from a
//! config file and prints the current campaign state. State-changing
//! actions need a wallet and are not available headlessly.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use crowdfund_client::amount::Amount;
use crowdfund_client::chain::HttpChainReader;
use crowdfund_client::config::load_config;
use crowdfund_client::query::ContractQueryService;

#[derive(Parser)]
#[command(name = "crowdfund-client")]
#[command(about = "Client for a crowdfunding campaign contract", long_about = None)]
struct Cli {
    /// Path to the TOML config file.
    #[arg(short, long, default_value = "client.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch and print the current campaign state
    Status,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    crowdfund_client::observability::logging::init();

    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    tracing::info!(
        contract = %format!("{}.{}", config.contract.address, config.contract.name),
        rpc_url = %config.network.rpc_url,
        "configuration loaded"
    );

    match cli.command {
        Commands::Status => {
            let reader = Arc::new(HttpChainReader::new(&config.network)?);
            let query = ContractQueryService::new(reader, config.contract.clone());

            let snapshot = query.fetch_snapshot("").await?;

            println!("Campaign {}.{}", config.contract.address, config.contract.name);
            println!("  Goal:     {} STX", Amount::from_base_units(snapshot.funding_goal));
            println!("  Pledged:  {} STX", Amount::from_base_units(snapshot.total_pledged));
            println!("  Deadline: block #{}", snapshot.deadline);
            println!("  Height:   block #{}", snapshot.chain_height);
            println!(
                "  Status:   {}",
                if snapshot.funding_successful {
                    "goal reached"
                } else {
                    "in progress"
                }
            );
        }
    }

    Ok(())
}
