//! Token distribution scenario
//!
//! Creates a treasury and two recipients, issues a token, transfers part of
//! the supply, mints more and distributes it to both recipients, checking
//! balances along the way.

pub mod config;
pub mod runner;

pub use config::ScenarioConfig;
pub use runner::{run_scenario, BalanceRow, Checkpoint, ScenarioError, ScenarioReport};
