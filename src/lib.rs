//! Token Ledger: a deterministic in-memory model of a token service
//!
//! This crate provides:
//! - An in-memory ledger of accounts and fungible tokens
//! - Decimal scaling between whole tokens and smallest units
//! - Association gating and zero-sum multi-party transfers
//! - Minting into a token's treasury
//! - Immutable, signed transactions applied through a single `submit`
//! - JSON snapshot persistence with backups
//! - A scripted distribution scenario with balance checkpoints
//!
//! # Example
//!
//! ```rust
//! use token_ledger::crypto::KeyPair;
//! use token_ledger::scenario::{run_scenario, ScenarioConfig};
//!
//! let operator = KeyPair::generate();
//! let report = run_scenario(&ScenarioConfig::default(), &operator).unwrap();
//!
//! for checkpoint in &report.checkpoints {
//!     for row in &checkpoint.rows {
//!         println!("{} ({}): {} {}", row.name, row.account, row.display, checkpoint.symbol);
//!     }
//! }
//! ```

pub mod cli;
pub mod crypto;
pub mod ledger;
pub mod scenario;
pub mod storage;
pub mod transaction;

// Re-export commonly used types
pub use crypto::{KeyPair, Signer};
pub use ledger::{
    AccountId, LedgerError, LedgerModel, LedgerSnapshot, SupplyType, TokenId, TransferIntent,
};
pub use scenario::{run_scenario, ScenarioConfig, ScenarioReport};
pub use storage::{Storage, StorageConfig};
pub use transaction::{submit, Receipt, SignedTransaction, Transaction, TransactionBody};
