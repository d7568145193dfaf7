//! journal-tx operator CLI
//!
//! Read-only helpers around the journal workflow: check whether an account can
//! pay for a journal, print the transaction that would be signed, and plan a
//! coin consolidation. Signing happens in the user's wallet, never here.

// Compiler warning configuration
#![deny(unused_imports)]
#![deny(unused_mut)]
#![deny(unused_variables)]
#![warn(unused_must_use)]

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use journal_tx::client::RpcClient;
use journal_tx::config::Config;
use journal_tx::gas::{build_consolidation_transaction, ensure_sufficient_funds};
use journal_tx::journal::prepare_journal_transaction;
use journal_tx::tx_builder::FeeConfiguration;
use journal_tx::types::{MoveTarget, SuiAddress};
use journal_tx::units::{format_sui, sui_to_mist};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "journal.toml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that an address can pay for a journal transaction
    Balance {
        #[arg(long, env = "JOURNAL_ADDRESS")]
        address: String,

        /// Override the fee budget, in SUI (e.g. 0.1)
        #[arg(long, value_parser = parse_sui_budget)]
        budget: Option<u64>,
    },

    /// Build and validate the journal transaction and print it as JSON
    Plan {
        #[arg(long, env = "JOURNAL_ADDRESS")]
        address: String,

        #[arg(long)]
        title: String,
    },

    /// Print a transaction merging the address's coins, if advisable
    Consolidate {
        #[arg(long, env = "JOURNAL_ADDRESS")]
        address: String,
    },
}

fn parse_sui_budget(value: &str) -> Result<u64, String> {
    let mist = sui_to_mist(value).map_err(|e| e.to_string())?;
    u64::try_from(mist.as_u128()).map_err(|_| format!("budget '{}' is too large", value))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.verbose)?;

    let config = load_config(&args.config)?;
    let mut fee = config.gas.fee_configuration();

    match args.command {
        Command::Balance { address, budget } => {
            if budget.is_some() {
                fee.budget = budget;
            }
            run_balance(&config, &fee, &address).await
        }
        Command::Plan { address, title } => run_plan(&config, &fee, &address, &title),
        Command::Consolidate { address } => run_consolidate(&config, &fee, &address).await,
    }
}

/// Initialize logging subsystem
fn init_logging(verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        "journal_tx=debug,info"
    } else {
        "journal_tx=info,warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    Ok(())
}

/// Load configuration from file with fallback to defaults
fn load_config(path: &str) -> Result<Config> {
    if std::path::Path::new(path).exists() {
        Config::from_file_with_env(path)
            .with_context(|| format!("Failed to load config from {}", path))
    } else {
        warn!("Config file '{}' not found, using defaults", path);
        dotenvy::dotenv().ok();
        let mut config = Config::default();
        config.apply_env_overrides();
        Ok(config)
    }
}

fn rpc_client(config: &Config) -> Result<RpcClient> {
    let url = config.network.rpc_url();
    info!(network = %config.network.network, rpc_url = url, "Using full node");
    RpcClient::new(url, config.network.rpc_settings()).context("Failed to create RPC client")
}

fn parse_address(address: &str) -> Result<SuiAddress> {
    address
        .parse()
        .with_context(|| format!("invalid address '{}'", address))
}

async fn run_balance(config: &Config, fee: &FeeConfiguration, address: &str) -> Result<()> {
    let client = rpc_client(config)?;
    let owner = parse_address(address)?;

    let report = ensure_sufficient_funds(
        &client,
        &owner,
        &config.gas.coin_type,
        &Default::default(),
        fee,
    )
    .await?;

    println!(
        "{}: {} SUI across {} coin(s), {} SUI required",
        owner,
        format_sui(report.total_balance),
        report.coin_count,
        format_sui(report.required)
    );
    if let Some(advice) = report.consolidation {
        println!(
            "{} coins held; run `consolidate` to merge them",
            advice.coin_count
        );
    }
    Ok(())
}

fn run_plan(config: &Config, fee: &FeeConfiguration, address: &str, title: &str) -> Result<()> {
    let target = MoveTarget::new_journal(config.network.package_id()?);
    let tx = prepare_journal_transaction(&target, fee, Some(address), title)?;
    let data = tx.data().context("transaction became unreadable")?;
    println!("{}", serde_json::to_string_pretty(data)?);
    Ok(())
}

async fn run_consolidate(config: &Config, fee: &FeeConfiguration, address: &str) -> Result<()> {
    let client = rpc_client(config)?;
    let owner = parse_address(address)?;

    let report = ensure_sufficient_funds(
        &client,
        &owner,
        &config.gas.coin_type,
        &Default::default(),
        fee,
    )
    .await?;

    let Some(advice) = report.consolidation else {
        println!("{} coin(s) held, nothing to consolidate", report.coin_count);
        return Ok(());
    };

    match build_consolidation_transaction(&advice, fee) {
        Some(tx) => {
            let data = tx.data().context("consolidation transaction is malformed")?;
            println!("{}", serde_json::to_string_pretty(data)?);
        }
        None => println!("max_fee_object_count leaves fewer than two coins to merge"),
    }
    Ok(())
}
