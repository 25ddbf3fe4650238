//! CLI commands for the token ledger
//!
//! Implements all command handlers for the CLI interface.

use crate::crypto::{KeyPair, Signer};
use crate::ledger::LedgerModel;
use crate::scenario::{run_scenario, Checkpoint, ScenarioConfig};
use crate::storage::{Storage, StorageConfig};
use std::path::{Path, PathBuf};

/// Result type for CLI operations
pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

fn open_storage(data_dir: &Path) -> CliResult<Storage> {
    let storage_config = StorageConfig {
        data_dir: data_dir.to_path_buf(),
        ..Default::default()
    };
    Ok(Storage::new(storage_config)?)
}

fn load_ledger(data_dir: &Path) -> CliResult<Option<LedgerModel>> {
    let storage = open_storage(data_dir)?;
    if !storage.exists() {
        println!("📭 No saved ledger in {:?}. Run: token-ledger demo --save", data_dir);
        return Ok(None);
    }
    Ok(Some(storage.load()?))
}

/// Print a balance checkpoint
pub fn print_checkpoint(checkpoint: &Checkpoint) {
    println!("\n==================================================");
    println!("== {} ==", checkpoint.label);
    println!("--- Balances for {} ---", checkpoint.symbol);
    for row in &checkpoint.rows {
        println!(
            "- {} ({}) Balance: {} {}",
            row.name, row.account, row.display, checkpoint.symbol
        );
    }
    println!("==================================================");
}

/// Run the distribution scenario
pub fn cmd_demo(
    data_dir: &PathBuf,
    config: &ScenarioConfig,
    private_key: Option<&str>,
    save: bool,
) -> CliResult<()> {
    let operator = match private_key {
        Some(hex_key) => KeyPair::from_private_key_hex(hex_key)?,
        None => {
            println!("🔑 No operator key supplied, generating one");
            KeyPair::generate()
        }
    };

    println!("🚀 Running {} scenario", config.token_symbol);
    println!("   Operator key: {}...", &operator.public_key_hex()[..16]);

    let report = run_scenario(config, &operator)?;

    println!("\n✅ Treasury ID: {}", report.treasury);
    println!("✅ Recipient A ID: {}", report.recipient_a);
    println!("✅ Recipient B ID: {}", report.recipient_b);
    println!("✅ Token created: {} (ID: {})", config.token_symbol, report.token);

    for (step, receipt) in &report.receipts {
        println!(
            "   ├─ {:<24} {} {:?}",
            step,
            &receipt.transaction_id[..12],
            receipt.status
        );
    }

    if let Some(first) = report.checkpoints.first() {
        print_checkpoint(first);
    }
    println!(
        "\n✅ Minted {} {}, distributed {} {} in bulk",
        config.mint_amount,
        config.token_symbol,
        config.bulk_total(),
        config.token_symbol
    );
    if let Some(last) = report.checkpoints.last() {
        print_checkpoint(last);
    }

    if save {
        let storage = open_storage(data_dir)?;
        storage.save(&report.ledger)?;
        println!("\n💾 Ledger saved to {:?}", storage.snapshot_path());
    }

    Ok(())
}

/// Show balances of every account for every token in the saved ledger
pub fn cmd_balances(data_dir: &PathBuf) -> CliResult<()> {
    let Some(ledger) = load_ledger(data_dir)? else {
        return Ok(());
    };

    println!("💰 Account balances:");
    for account in ledger.accounts() {
        println!("\n   {} ({} base units)", account.id, account.balance);
        for token_id in account.associations() {
            if let Some(token) = ledger.token(*token_id) {
                println!(
                    "   └─ {} {}",
                    ledger.display_balance(account.id, *token_id)?,
                    token.symbol
                );
            }
        }
    }

    Ok(())
}

/// List tokens in the saved ledger
pub fn cmd_tokens(data_dir: &PathBuf) -> CliResult<()> {
    let Some(ledger) = load_ledger(data_dir)? else {
        return Ok(());
    };

    println!("🪙 Tokens:");
    for token in ledger.tokens() {
        println!("\n   {} {} ({})", token.id, token.symbol, token.name);
        println!("   ├─ Decimals: {}", token.decimals);
        println!("   ├─ Treasury: {}", token.treasury);
        println!("   ├─ Supply type: {:?}", token.supply_type);
        println!("   └─ Total supply: {}", token.format(token.total_supply));
    }

    Ok(())
}
