//! Token Ledger CLI Application
//!
//! A command-line interface for running the token distribution scenario and
//! inspecting saved ledgers.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use token_ledger::cli;
use token_ledger::ledger::{to_smallest_unit, SupplyType};
use token_ledger::scenario::ScenarioConfig;

#[derive(Parser)]
#[command(name = "token-ledger")]
#[command(author = "Darshan")]
#[command(version = "0.1.0")]
#[command(about = "Deterministic in-memory token ledger", long_about = None)]
struct Cli {
    /// Data directory for ledger snapshots
    #[arg(short, long, default_value = ".ledger_data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the token distribution scenario
    Demo(DemoArgs),

    /// Show balances from the saved ledger
    Balances,

    /// List tokens in the saved ledger
    Tokens,
}

#[derive(Args)]
struct DemoArgs {
    /// Operator private key (hex, secp256k1); generated when absent
    #[arg(long, env = "MY_PRIVATE_KEY", hide_env_values = true)]
    private_key: Option<String>,

    /// Token name
    #[arg(long, default_value = "MyToken")]
    name: String,

    /// Token symbol
    #[arg(long, default_value = "MYT")]
    symbol: String,

    /// Decimal places
    #[arg(long, default_value = "2")]
    decimals: u8,

    /// Maximum supply in whole tokens (infinite when absent)
    #[arg(long)]
    max_supply: Option<u64>,

    /// Initial supply in whole tokens
    #[arg(long, default_value = "1000")]
    initial_supply: u64,

    /// First transfer to recipient A in whole tokens
    #[arg(long, default_value = "50")]
    initial_transfer: u64,

    /// Whole tokens to mint
    #[arg(long, default_value = "500")]
    mint: u64,

    /// Whole tokens sent to each recipient in the bulk distribution
    #[arg(long, default_value = "100")]
    bulk: u64,

    /// Starting base-currency balance of the treasury
    #[arg(long, default_value = "10000000000")]
    treasury_balance: u64,

    /// Starting base-currency balance of each recipient
    #[arg(long, default_value = "1000")]
    recipient_balance: u64,

    /// Save the final ledger into the data directory
    #[arg(long)]
    save: bool,
}

impl DemoArgs {
    /// Scenario configuration described by these flags
    fn scenario_config(&self) -> Result<ScenarioConfig, &'static str> {
        let supply_type = match self.max_supply {
            Some(max) => SupplyType::Finite {
                max_supply: to_smallest_unit(max, self.decimals)
                    .ok_or("max supply overflows the token's precision")?,
            },
            None => SupplyType::Infinite,
        };

        Ok(ScenarioConfig {
            token_name: self.name.clone(),
            token_symbol: self.symbol.clone(),
            decimals: self.decimals,
            supply_type,
            initial_supply: self.initial_supply,
            initial_transfer: self.initial_transfer,
            mint_amount: self.mint,
            bulk_amount: self.bulk,
            treasury_initial_balance: self.treasury_balance,
            recipient_initial_balance: self.recipient_balance,
        })
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Demo(args) => {
            let config = args.scenario_config()?;
            cli::cmd_demo(
                &cli.data_dir,
                &config,
                args.private_key.as_deref(),
                args.save,
            )?;
        }

        Commands::Balances => {
            cli::cmd_balances(&cli.data_dir)?;
        }

        Commands::Tokens => {
            cli::cmd_tokens(&cli.data_dir)?;
        }
    }

    Ok(())
}
