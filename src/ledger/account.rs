//! Ledger accounts
//!
//! An account holds a base-currency balance plus one token balance per
//! associated token. The key set of `token_balances` is the association set.

use crate::ledger::types::{AccountId, TokenId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A ledger account
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique account id
    pub id: AccountId,
    /// Base-currency balance in its smallest unit
    pub balance: u64,
    /// Associated tokens and their balances in smallest units
    token_balances: BTreeMap<TokenId, u64>,
}

impl Account {
    /// Create an account with no token associations
    pub fn new(id: AccountId, balance: u64) -> Self {
        Self {
            id,
            balance,
            token_balances: BTreeMap::new(),
        }
    }

    /// Whether this account may hold `token`
    pub fn is_associated(&self, token: &TokenId) -> bool {
        self.token_balances.contains_key(token)
    }

    /// Associate with a token. Returns `false` if already associated.
    pub fn associate(&mut self, token: TokenId) -> bool {
        if self.is_associated(&token) {
            return false;
        }
        self.token_balances.insert(token, 0);
        true
    }

    /// Token balance, zero when not associated
    pub fn token_balance(&self, token: &TokenId) -> u64 {
        self.token_balances.get(token).copied().unwrap_or(0)
    }

    /// Associated token ids in ascending order
    pub fn associations(&self) -> impl Iterator<Item = &TokenId> {
        self.token_balances.keys()
    }

    /// All token balances, including zero balances of associated tokens
    pub fn token_balances(&self) -> &BTreeMap<TokenId, u64> {
        &self.token_balances
    }

    /// Overwrite the balance of an associated token.
    ///
    /// Callers validate association and bounds first.
    pub(crate) fn set_token_balance(&mut self, token: TokenId, amount: u64) {
        self.token_balances.insert(token, amount);
    }
}
