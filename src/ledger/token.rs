//! Fungible token definitions
//!
//! A token records its fixed decimal precision, the treasury account that
//! receives newly issued supply, and the running total supply.

use crate::ledger::types::{format_units, to_smallest_unit, AccountId, TokenId, MAX_DECIMALS};
use serde::{Deserialize, Serialize};

/// Kind of token
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TokenType {
    /// Interchangeable units sharing one balance per account
    #[default]
    FungibleCommon,
}

/// Upper bound on a token's total supply
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SupplyType {
    /// No upper bound
    #[default]
    Infinite,
    /// Supply may never exceed `max_supply` smallest units
    Finite { max_supply: u64 },
}

impl SupplyType {
    /// Whether a total supply of `supply` is allowed
    pub fn permits(&self, supply: u64) -> bool {
        match self {
            SupplyType::Infinite => true,
            SupplyType::Finite { max_supply } => supply <= *max_supply,
        }
    }
}

/// A fungible token tracked by the ledger
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Unique token id
    pub id: TokenId,
    /// Token name (e.g., "MyToken")
    pub name: String,
    /// Token symbol (e.g., "MYT")
    pub symbol: String,
    /// Decimal places, fixed at creation
    pub decimals: u8,
    /// Account holding newly issued supply
    pub treasury: AccountId,
    /// Total supply in smallest units; only ever grows
    pub total_supply: u64,
    #[serde(default)]
    pub supply_type: SupplyType,
    #[serde(default)]
    pub token_type: TokenType,
}

impl Token {
    /// Whether `decimals` is a supported precision
    pub fn valid_decimals(decimals: u8) -> bool {
        decimals <= MAX_DECIMALS
    }

    /// Whether `symbol` is 1-10 characters
    pub fn valid_symbol(symbol: &str) -> bool {
        let len = symbol.chars().count();
        (1..=10).contains(&len)
    }

    /// Whether `name` is 1-100 characters
    pub fn valid_name(name: &str) -> bool {
        let len = name.chars().count();
        (1..=100).contains(&len)
    }

    /// Convert whole tokens to smallest units at this token's precision
    pub fn to_smallest_unit(&self, whole: u64) -> Option<u64> {
        to_smallest_unit(whole, self.decimals)
    }

    /// Render smallest units as whole tokens
    pub fn format(&self, amount: u64) -> String {
        format_units(amount, self.decimals)
    }
}
