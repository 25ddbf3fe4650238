//! Scenario configuration

use crate::ledger::SupplyType;
use serde::{Deserialize, Serialize};

/// Parameters of the token distribution scenario.
///
/// Token amounts are in whole tokens, base balances in the base currency's
/// smallest unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub token_name: String,
    pub token_symbol: String,
    pub decimals: u8,
    pub supply_type: SupplyType,
    pub initial_supply: u64,
    /// First transfer from the treasury to recipient A
    pub initial_transfer: u64,
    /// Minted into the treasury after the first checkpoint
    pub mint_amount: u64,
    /// Sent to each recipient in the bulk distribution
    pub bulk_amount: u64,
    pub treasury_initial_balance: u64,
    pub recipient_initial_balance: u64,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            token_name: "MyToken".to_string(),
            token_symbol: "MYT".to_string(),
            decimals: 2,
            supply_type: SupplyType::Infinite,
            initial_supply: 1000,
            initial_transfer: 50,
            mint_amount: 500,
            bulk_amount: 100,
            treasury_initial_balance: 10_000_000_000,
            recipient_initial_balance: 1000,
        }
    }
}

impl ScenarioConfig {
    /// Whole tokens sent out by the bulk distribution
    pub fn bulk_total(&self) -> u64 {
        self.bulk_amount.saturating_mul(2)
    }
}
