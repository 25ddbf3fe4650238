//! In-memory ledger model
//!
//! Owns every account and token and applies the mutating operations
//! (token creation, association, transfer, mint). Each operation validates
//! completely before touching state, so a failed call leaves the ledger
//! exactly as it was.

use crate::ledger::account::Account;
use crate::ledger::intent::TransferIntent;
use crate::ledger::token::{SupplyType, Token, TokenType};
use crate::ledger::types::{to_smallest_unit, AccountId, EntityId, TokenId, FIRST_ENTITY_NUM};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet, VecDeque};
use thiserror::Error;

/// Number of events kept in the ledger history
pub const HISTORY_LIMIT: usize = 1000;

/// Ledger-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Unknown account: {0}")]
    UnknownAccount(AccountId),
    #[error("Unknown token: {0}")]
    UnknownToken(TokenId),
    #[error("Account {account} is not associated with token {token}")]
    UnassociatedAccount { account: AccountId, token: TokenId },
    #[error("Unbalanced transfer: deltas sum to {sum}, expected 0")]
    UnbalancedIntent { sum: i128 },
    #[error("Insufficient balance in {account}: have {have}, need {need}")]
    InsufficientBalance {
        account: AccountId,
        have: u64,
        need: u64,
    },
    #[error("Invalid decimals: must be 0-18")]
    InvalidDecimals,
    #[error("Invalid symbol: must be 1-10 characters")]
    InvalidSymbol,
    #[error("Invalid name: must be 1-100 characters")]
    InvalidName,
    #[error("Amount overflows the smallest-unit range")]
    AmountOverflow,
    #[error("Supply of token {token} would exceed its maximum of {max_supply}")]
    SupplyExceeded { token: TokenId, max_supply: u64 },
    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),
}

/// What a mutating operation did
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEventKind {
    AccountCreated {
        account: AccountId,
        initial_balance: u64,
    },
    TokenCreated {
        token: TokenId,
        treasury: AccountId,
        initial_supply: u64,
    },
    Associated {
        account: AccountId,
        token: TokenId,
    },
    Transferred {
        token: TokenId,
        deltas: Vec<(AccountId, i64)>,
    },
    Minted {
        token: TokenId,
        amount: u64,
        total_supply: u64,
    },
}

/// A recorded ledger event
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LedgerEvent {
    pub kind: LedgerEventKind,
    pub timestamp: DateTime<Utc>,
}

/// Serializable image of a ledger's accounts and tokens
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub accounts: Vec<Account>,
    pub tokens: Vec<Token>,
    pub next_entity_num: u64,
}

/// In-memory ledger of accounts and fungible tokens
#[derive(Clone, Debug)]
pub struct LedgerModel {
    accounts: BTreeMap<AccountId, Account>,
    tokens: BTreeMap<TokenId, Token>,
    /// Shared counter for account and token numbers
    next_entity_num: u64,
    history: VecDeque<LedgerEvent>,
}

impl Default for LedgerModel {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerModel {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self {
            accounts: BTreeMap::new(),
            tokens: BTreeMap::new(),
            next_entity_num: FIRST_ENTITY_NUM,
            history: VecDeque::new(),
        }
    }

    fn next_entity(&mut self) -> EntityId {
        let id = EntityId::new(self.next_entity_num);
        self.next_entity_num += 1;
        id
    }

    fn record(&mut self, kind: LedgerEventKind) {
        if self.history.len() == HISTORY_LIMIT {
            self.history.pop_front();
        }
        self.history.push_back(LedgerEvent {
            kind,
            timestamp: Utc::now(),
        });
    }

    // =========================================================================
    // Mutating operations
    // =========================================================================

    /// Create an account holding `initial_balance` base units
    pub fn create_account(&mut self, initial_balance: u64) -> AccountId {
        let id = AccountId(self.next_entity());
        self.accounts.insert(id, Account::new(id, initial_balance));

        log::info!("Account created: {} ({} base units)", id, initial_balance);
        self.record(LedgerEventKind::AccountCreated {
            account: id,
            initial_balance,
        });

        id
    }

    /// Create a fungible token.
    ///
    /// The whole initial supply is credited to `treasury`, which becomes
    /// associated with the token.
    pub fn create_token(
        &mut self,
        name: &str,
        symbol: &str,
        decimals: u8,
        treasury: AccountId,
        initial_supply_whole: u64,
        supply_type: SupplyType,
    ) -> Result<TokenId, LedgerError> {
        if !self.accounts.contains_key(&treasury) {
            return Err(LedgerError::UnknownAccount(treasury));
        }
        if !Token::valid_name(name) {
            return Err(LedgerError::InvalidName);
        }
        if !Token::valid_symbol(symbol) {
            return Err(LedgerError::InvalidSymbol);
        }
        if !Token::valid_decimals(decimals) {
            return Err(LedgerError::InvalidDecimals);
        }

        let initial_supply = to_smallest_unit(initial_supply_whole, decimals)
            .ok_or(LedgerError::AmountOverflow)?;

        // The id is only reserved once validation has passed
        let id = TokenId(EntityId::new(self.next_entity_num));
        if let SupplyType::Finite { max_supply } = supply_type {
            if initial_supply > max_supply {
                return Err(LedgerError::SupplyExceeded {
                    token: id,
                    max_supply,
                });
            }
        }
        self.next_entity_num += 1;

        let token = Token {
            id,
            name: name.to_string(),
            symbol: symbol.to_string(),
            decimals,
            treasury,
            total_supply: initial_supply,
            supply_type,
            token_type: TokenType::FungibleCommon,
        };
        self.tokens.insert(id, token);

        if let Some(account) = self.accounts.get_mut(&treasury) {
            account.associate(id);
            account.set_token_balance(id, initial_supply);
        }

        log::info!(
            "Token created: {} ({}) at {}, treasury {}, supply {}",
            name,
            symbol,
            id,
            treasury,
            initial_supply
        );
        self.record(LedgerEventKind::TokenCreated {
            token: id,
            treasury,
            initial_supply,
        });

        Ok(id)
    }

    /// Associate an account with a token. Associating twice is a no-op.
    pub fn associate(&mut self, account: AccountId, token: TokenId) -> Result<(), LedgerError> {
        if !self.tokens.contains_key(&token) {
            return Err(LedgerError::UnknownToken(token));
        }
        let holder = self
            .accounts
            .get_mut(&account)
            .ok_or(LedgerError::UnknownAccount(account))?;

        if holder.associate(token) {
            log::debug!("Associated {} with token {}", account, token);
            self.record(LedgerEventKind::Associated { account, token });
        } else {
            log::debug!("{} already associated with token {}", account, token);
        }

        Ok(())
    }

    /// Apply a zero-sum transfer intent atomically
    pub fn transfer(&mut self, token: TokenId, intent: &TransferIntent) -> Result<(), LedgerError> {
        let updates = self.validate_transfer(token, intent).map_err(|e| {
            log::debug!("Transfer of {} rejected: {}", token, e);
            e
        })?;

        for (account, new_balance) in &updates {
            if let Some(holder) = self.accounts.get_mut(account) {
                holder.set_token_balance(token, *new_balance);
            }
        }

        log::info!(
            "Transfer applied on {}: {} adjustment(s)",
            token,
            intent.deltas().len()
        );
        self.record(LedgerEventKind::Transferred {
            token,
            deltas: intent.deltas().iter().map(|d| (d.account, d.delta)).collect(),
        });

        Ok(())
    }

    /// Check a transfer and compute the resulting balances without mutating
    fn validate_transfer(
        &self,
        token: TokenId,
        intent: &TransferIntent,
    ) -> Result<Vec<(AccountId, u64)>, LedgerError> {
        if !self.tokens.contains_key(&token) {
            return Err(LedgerError::UnknownToken(token));
        }

        let net = intent.net_deltas();

        for account in net.keys() {
            if !self.accounts.contains_key(account) {
                return Err(LedgerError::UnknownAccount(*account));
            }
        }

        // Checked per entry: offsetting entries do not exempt an account
        for entry in intent.deltas() {
            if entry.delta != 0 && !self.is_associated(entry.account, token) {
                return Err(LedgerError::UnassociatedAccount {
                    account: entry.account,
                    token,
                });
            }
        }

        if !intent.is_balanced() {
            return Err(LedgerError::UnbalancedIntent { sum: intent.sum() });
        }

        let mut updates = Vec::with_capacity(net.len());
        for (account, delta) in net {
            if delta == 0 {
                continue;
            }
            let have = self.balance_of(account, token);
            let next = have as i128 + delta;
            if next < 0 {
                return Err(LedgerError::InsufficientBalance {
                    account,
                    have,
                    need: u64::try_from(-delta).unwrap_or(u64::MAX),
                });
            }
            let next = u64::try_from(next).map_err(|_| LedgerError::AmountOverflow)?;
            updates.push((account, next));
        }

        Ok(updates)
    }

    /// Mint `amount_whole` new tokens into the treasury.
    ///
    /// New value enters the system here, so this deliberately bypasses the
    /// zero-sum rule of [`LedgerModel::transfer`].
    pub fn mint(&mut self, token: TokenId, amount_whole: u64) -> Result<u64, LedgerError> {
        let definition = self
            .tokens
            .get(&token)
            .ok_or(LedgerError::UnknownToken(token))?;

        let amount = definition
            .to_smallest_unit(amount_whole)
            .ok_or(LedgerError::AmountOverflow)?;
        let total_supply = definition
            .total_supply
            .checked_add(amount)
            .ok_or(LedgerError::AmountOverflow)?;
        if let SupplyType::Finite { max_supply } = definition.supply_type {
            if total_supply > max_supply {
                return Err(LedgerError::SupplyExceeded { token, max_supply });
            }
        }

        let treasury = definition.treasury;
        let treasury_balance = self
            .balance_of(treasury, token)
            .checked_add(amount)
            .ok_or(LedgerError::AmountOverflow)?;

        let holder = self
            .accounts
            .get_mut(&treasury)
            .ok_or(LedgerError::UnknownAccount(treasury))?;
        holder.associate(token);
        holder.set_token_balance(token, treasury_balance);

        if let Some(definition) = self.tokens.get_mut(&token) {
            definition.total_supply = total_supply;
        }

        log::info!(
            "Minted {} units of {} into treasury {} (supply {})",
            amount,
            token,
            treasury,
            total_supply
        );
        self.record(LedgerEventKind::Minted {
            token,
            amount,
            total_supply,
        });

        Ok(total_supply)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Token balance in smallest units; zero when unassociated
    pub fn balance_of(&self, account: AccountId, token: TokenId) -> u64 {
        self.accounts
            .get(&account)
            .map(|a| a.token_balance(&token))
            .unwrap_or(0)
    }

    /// Token balance as whole tokens with `decimals` fractional digits
    pub fn display_balance(&self, account: AccountId, token: TokenId) -> Result<String, LedgerError> {
        let definition = self
            .tokens
            .get(&token)
            .ok_or(LedgerError::UnknownToken(token))?;
        Ok(definition.format(self.balance_of(account, token)))
    }

    /// Base-currency balance of an account
    pub fn base_balance(&self, account: AccountId) -> Result<u64, LedgerError> {
        self.accounts
            .get(&account)
            .map(|a| a.balance)
            .ok_or(LedgerError::UnknownAccount(account))
    }

    pub fn is_associated(&self, account: AccountId, token: TokenId) -> bool {
        self.accounts
            .get(&account)
            .map(|a| a.is_associated(&token))
            .unwrap_or(false)
    }

    pub fn total_supply(&self, token: TokenId) -> Result<u64, LedgerError> {
        self.tokens
            .get(&token)
            .map(|t| t.total_supply)
            .ok_or(LedgerError::UnknownToken(token))
    }

    pub fn account(&self, id: AccountId) -> Option<&Account> {
        self.accounts.get(&id)
    }

    pub fn token(&self, id: TokenId) -> Option<&Token> {
        self.tokens.get(&id)
    }

    /// Accounts in id order
    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values()
    }

    /// Tokens in id order
    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.tokens.values()
    }

    /// Recent mutating operations, oldest first
    pub fn history(&self) -> &VecDeque<LedgerEvent> {
        &self.history
    }

    // =========================================================================
    // Snapshots
    // =========================================================================

    /// Capture accounts and tokens for persistence
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            accounts: self.accounts.values().cloned().collect(),
            tokens: self.tokens.values().cloned().collect(),
            next_entity_num: self.next_entity_num,
        }
    }

    /// Rebuild a ledger from a snapshot, checking referential integrity and
    /// that every token's balances add up to its total supply.
    pub fn restore(snapshot: LedgerSnapshot) -> Result<Self, LedgerError> {
        let invalid = |msg: String| LedgerError::InvalidSnapshot(msg);

        let mut seen = HashSet::new();
        let mut max_num = 0u64;

        let mut accounts = BTreeMap::new();
        for account in snapshot.accounts {
            if !seen.insert(account.id.0) {
                return Err(invalid(format!("duplicate entity id {}", account.id)));
            }
            max_num = max_num.max(account.id.0.num);
            accounts.insert(account.id, account);
        }

        let mut tokens = BTreeMap::new();
        for token in snapshot.tokens {
            if !seen.insert(token.id.0) {
                return Err(invalid(format!("duplicate entity id {}", token.id)));
            }
            max_num = max_num.max(token.id.0.num);
            tokens.insert(token.id, token);
        }

        if snapshot.next_entity_num <= max_num {
            return Err(invalid(format!(
                "next entity number {} is not above existing id {}",
                snapshot.next_entity_num, max_num
            )));
        }

        let mut held: BTreeMap<TokenId, u128> = BTreeMap::new();
        for account in accounts.values() {
            for (token, balance) in account.token_balances() {
                if !tokens.contains_key(token) {
                    return Err(invalid(format!(
                        "account {} references unknown token {}",
                        account.id, token
                    )));
                }
                *held.entry(*token).or_insert(0) += *balance as u128;
            }
        }

        for token in tokens.values() {
            let treasury = accounts.get(&token.treasury).ok_or_else(|| {
                invalid(format!(
                    "token {} references unknown treasury {}",
                    token.id, token.treasury
                ))
            })?;
            if !treasury.is_associated(&token.id) {
                return Err(invalid(format!(
                    "treasury {} is not associated with token {}",
                    token.treasury, token.id
                )));
            }
            if !token.supply_type.permits(token.total_supply) {
                return Err(invalid(format!(
                    "token {} supply {} exceeds its maximum",
                    token.id, token.total_supply
                )));
            }
            let sum = held.get(&token.id).copied().unwrap_or(0);
            if sum != token.total_supply as u128 {
                return Err(invalid(format!(
                    "balances of token {} sum to {}, total supply is {}",
                    token.id, sum, token.total_supply
                )));
            }
        }

        Ok(Self {
            accounts,
            tokens,
            next_entity_num: snapshot.next_entity_num,
            history: VecDeque::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Ledger with a funded treasury and a 2-decimal token of 1000 whole units
    fn setup() -> (LedgerModel, AccountId, TokenId) {
        let mut ledger = LedgerModel::new();
        let treasury = ledger.create_account(10_000);
        let token = ledger
            .create_token("MyToken", "MYT", 2, treasury, 1000, SupplyType::Infinite)
            .unwrap();
        (ledger, treasury, token)
    }

    fn balances(ledger: &LedgerModel, token: TokenId) -> Vec<(AccountId, u64)> {
        ledger
            .accounts()
            .map(|a| (a.id, a.token_balance(&token)))
            .collect()
    }

    #[test]
    fn test_create_account_assigns_fresh_ids() {
        let mut ledger = LedgerModel::new();
        let a = ledger.create_account(1000);
        let b = ledger.create_account(0);

        assert_ne!(a, b);
        assert_eq!(a.to_string(), "0.0.1001");
        assert_eq!(ledger.base_balance(a).unwrap(), 1000);
        assert_eq!(ledger.account(b).unwrap().associations().count(), 0);
    }

    #[test]
    fn test_create_token_credits_treasury() {
        let (ledger, treasury, token) = setup();

        assert_eq!(ledger.balance_of(treasury, token), 100_000);
        assert_eq!(ledger.total_supply(token).unwrap(), 100_000);
        assert!(ledger.is_associated(treasury, token));
        assert_eq!(ledger.token(token).unwrap().symbol, "MYT");
    }

    #[test]
    fn test_create_token_unknown_treasury() {
        let mut ledger = LedgerModel::new();
        let ghost = AccountId(EntityId::new(9999));

        let result = ledger.create_token("MyToken", "MYT", 2, ghost, 1000, SupplyType::Infinite);
        assert_eq!(result, Err(LedgerError::UnknownAccount(ghost)));
        assert_eq!(ledger.tokens().count(), 0);
    }

    #[test]
    fn test_create_token_validation() {
        let mut ledger = LedgerModel::new();
        let treasury = ledger.create_account(0);

        assert_eq!(
            ledger.create_token("MyToken", "MYT", 19, treasury, 1, SupplyType::Infinite),
            Err(LedgerError::InvalidDecimals)
        );
        assert_eq!(
            ledger.create_token("MyToken", "", 2, treasury, 1, SupplyType::Infinite),
            Err(LedgerError::InvalidSymbol)
        );
        assert_eq!(
            ledger.create_token("", "MYT", 2, treasury, 1, SupplyType::Infinite),
            Err(LedgerError::InvalidName)
        );
        assert_eq!(
            ledger.create_token("MyToken", "MYT", 18, treasury, 100, SupplyType::Infinite),
            Err(LedgerError::AmountOverflow)
        );
        assert!(matches!(
            ledger.create_token(
                "MyToken",
                "MYT",
                2,
                treasury,
                1000,
                SupplyType::Finite { max_supply: 99_999 }
            ),
            Err(LedgerError::SupplyExceeded { .. })
        ));

        // Failed creations do not consume entity numbers
        let next = ledger.create_account(0);
        assert_eq!(next.0.num, treasury.0.num + 1);
    }

    #[test]
    fn test_associate_errors() {
        let (mut ledger, treasury, token) = setup();
        let ghost_account = AccountId(EntityId::new(9999));
        let ghost_token = TokenId(EntityId::new(9998));

        assert_eq!(
            ledger.associate(ghost_account, token),
            Err(LedgerError::UnknownAccount(ghost_account))
        );
        assert_eq!(
            ledger.associate(treasury, ghost_token),
            Err(LedgerError::UnknownToken(ghost_token))
        );
    }

    #[test]
    fn test_associate_is_idempotent() {
        let (mut ledger, _, token) = setup();
        let recipient = ledger.create_account(1000);

        ledger.associate(recipient, token).unwrap();
        let once = ledger.snapshot();

        ledger.associate(recipient, token).unwrap();
        assert_eq!(ledger.snapshot(), once);
    }

    #[test]
    fn test_transfer_conserves_balances() {
        let (mut ledger, treasury, token) = setup();
        let recipient = ledger.create_account(1000);
        ledger.associate(recipient, token).unwrap();

        let before: u64 = balances(&ledger, token).iter().map(|(_, b)| b).sum();

        let intent = TransferIntent::new()
            .with(treasury, -5_000)
            .with(recipient, 5_000);
        ledger.transfer(token, &intent).unwrap();

        let after: u64 = balances(&ledger, token).iter().map(|(_, b)| b).sum();
        assert_eq!(before, after);
        assert_eq!(ledger.balance_of(treasury, token), 95_000);
        assert_eq!(ledger.balance_of(recipient, token), 5_000);
    }

    #[test]
    fn test_unassociated_balance_is_zero_but_transfer_fails() {
        let (mut ledger, treasury, token) = setup();
        let stranger = ledger.create_account(1000);

        assert_eq!(ledger.balance_of(stranger, token), 0);
        assert_eq!(ledger.display_balance(stranger, token).unwrap(), "0.00");

        let intent = TransferIntent::new()
            .with(treasury, -100)
            .with(stranger, 100);
        assert_eq!(
            ledger.transfer(token, &intent),
            Err(LedgerError::UnassociatedAccount {
                account: stranger,
                token
            })
        );
        assert_eq!(ledger.balance_of(treasury, token), 100_000);
    }

    #[test]
    fn test_transfer_unknown_token_and_account() {
        let (mut ledger, treasury, token) = setup();
        let ghost_token = TokenId(EntityId::new(9998));
        let ghost_account = AccountId(EntityId::new(9999));

        let intent = TransferIntent::new().with(treasury, -1).with(ghost_account, 1);
        assert_eq!(
            ledger.transfer(ghost_token, &intent),
            Err(LedgerError::UnknownToken(ghost_token))
        );
        assert_eq!(
            ledger.transfer(token, &intent),
            Err(LedgerError::UnknownAccount(ghost_account))
        );
    }

    #[test]
    fn test_transfer_unbalanced_intent_untouched() {
        let (mut ledger, treasury, token) = setup();
        let recipient = ledger.create_account(1000);
        ledger.associate(recipient, token).unwrap();
        let before = ledger.snapshot();

        let intent = TransferIntent::new()
            .with(treasury, -5_000)
            .with(recipient, 6_000);
        assert_eq!(
            ledger.transfer(token, &intent),
            Err(LedgerError::UnbalancedIntent { sum: 1_000 })
        );
        assert_eq!(ledger.snapshot(), before);
    }

    #[test]
    fn test_transfer_insufficient_balance_untouched() {
        let (mut ledger, treasury, token) = setup();
        let a = ledger.create_account(1000);
        let b = ledger.create_account(1000);
        ledger.associate(a, token).unwrap();
        ledger.associate(b, token).unwrap();
        ledger
            .transfer(token, &TransferIntent::new().with(treasury, -1_000).with(a, 1_000))
            .unwrap();
        let before = ledger.snapshot();

        // Treasury leg is valid, but `a` would go negative
        let intent = TransferIntent::new()
            .with(treasury, -500)
            .with(a, -1_500)
            .with(b, 2_000);
        assert_eq!(
            ledger.transfer(token, &intent),
            Err(LedgerError::InsufficientBalance {
                account: a,
                have: 1_000,
                need: 1_500
            })
        );
        assert_eq!(ledger.snapshot(), before);
    }

    #[test]
    fn test_transfer_nets_repeated_entries() {
        let (mut ledger, treasury, token) = setup();
        let recipient = ledger.create_account(0);
        ledger.associate(recipient, token).unwrap();

        let intent = TransferIntent::new()
            .with(treasury, -3_000)
            .with(recipient, 5_000)
            .with(treasury, -2_000);
        ledger.transfer(token, &intent).unwrap();

        assert_eq!(ledger.balance_of(treasury, token), 95_000);
        assert_eq!(ledger.balance_of(recipient, token), 5_000);
    }

    #[test]
    fn test_offsetting_entries_still_require_association() {
        let (mut ledger, _, token) = setup();
        let stranger = ledger.create_account(1000);
        let events = ledger.history().len();

        let intent = TransferIntent::new()
            .with(stranger, -100)
            .with(stranger, 100);
        assert_eq!(
            ledger.transfer(token, &intent),
            Err(LedgerError::UnassociatedAccount {
                account: stranger,
                token
            })
        );
        assert_eq!(ledger.history().len(), events);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut ledger = LedgerModel::new();
        for _ in 0..HISTORY_LIMIT + 5 {
            ledger.create_account(0);
        }

        assert_eq!(ledger.history().len(), HISTORY_LIMIT);
        // Oldest five account creations were evicted
        assert!(matches!(
            ledger.history().front().map(|e| &e.kind),
            Some(LedgerEventKind::AccountCreated { account, .. }) if account.0.num == FIRST_ENTITY_NUM + 5
        ));
    }

    #[test]
    fn test_mint_adds_exact_amount() {
        let (mut ledger, treasury, token) = setup();
        let other = ledger.create_account(0);
        ledger.associate(other, token).unwrap();

        let supply = ledger.mint(token, 500).unwrap();

        assert_eq!(supply, 150_000);
        assert_eq!(ledger.total_supply(token).unwrap(), 150_000);
        assert_eq!(ledger.balance_of(treasury, token), 150_000);
        assert_eq!(ledger.balance_of(other, token), 0);
    }

    #[test]
    fn test_mint_errors() {
        let (mut ledger, treasury, _) = setup();
        let ghost = TokenId(EntityId::new(9998));
        assert_eq!(ledger.mint(ghost, 1), Err(LedgerError::UnknownToken(ghost)));

        let capped = ledger
            .create_token(
                "Capped",
                "CAP",
                0,
                treasury,
                10,
                SupplyType::Finite { max_supply: 15 },
            )
            .unwrap();
        assert_eq!(ledger.mint(capped, 5).unwrap(), 15);
        assert_eq!(
            ledger.mint(capped, 1),
            Err(LedgerError::SupplyExceeded {
                token: capped,
                max_supply: 15
            })
        );
        assert_eq!(ledger.total_supply(capped).unwrap(), 15);
    }

    #[test]
    fn test_display_balance_unknown_token() {
        let (ledger, treasury, _) = setup();
        let ghost = TokenId(EntityId::new(9998));
        assert_eq!(
            ledger.display_balance(treasury, ghost),
            Err(LedgerError::UnknownToken(ghost))
        );
    }

    #[test]
    fn test_full_distribution_flow() {
        let (mut ledger, treasury, token) = setup();
        assert_eq!(ledger.balance_of(treasury, token), 100_000);

        let r = ledger.create_account(1000);
        ledger.associate(r, token).unwrap();
        ledger
            .transfer(token, &TransferIntent::new().with(treasury, -5_000).with(r, 5_000))
            .unwrap();
        assert_eq!(ledger.display_balance(treasury, token).unwrap(), "950.00");
        assert_eq!(ledger.display_balance(r, token).unwrap(), "50.00");

        ledger.mint(token, 500).unwrap();
        assert_eq!(ledger.total_supply(token).unwrap(), 150_000);
        assert_eq!(ledger.balance_of(treasury, token), 145_000);

        let s = ledger.create_account(1000);
        ledger.associate(s, token).unwrap();
        let intent = TransferIntent::distribute(treasury, &[(r, 10_000), (s, 10_000)]);
        ledger.transfer(token, &intent).unwrap();

        assert_eq!(ledger.balance_of(treasury, token), 125_000);
        assert_eq!(ledger.balance_of(r, token), 15_000);
        assert_eq!(ledger.balance_of(s, token), 10_000);
    }

    #[test]
    fn test_history_records_operations() {
        let (mut ledger, treasury, token) = setup();
        ledger.mint(token, 1).unwrap();

        let kinds: Vec<_> = ledger.history().iter().map(|e| &e.kind).collect();
        assert_eq!(kinds.len(), 3);
        assert!(matches!(kinds[0], LedgerEventKind::AccountCreated { account, .. } if *account == treasury));
        assert!(matches!(kinds[2], LedgerEventKind::Minted { amount: 100, .. }));
    }

    #[test]
    fn test_snapshot_restore() {
        let (mut ledger, treasury, token) = setup();
        let r = ledger.create_account(1000);
        ledger.associate(r, token).unwrap();
        ledger
            .transfer(token, &TransferIntent::new().with(treasury, -5_000).with(r, 5_000))
            .unwrap();

        let restored = LedgerModel::restore(ledger.snapshot()).unwrap();
        assert_eq!(restored.snapshot(), ledger.snapshot());
        assert_eq!(restored.balance_of(r, token), 5_000);

        // Fresh ids continue after the restored ones
        let mut restored = restored;
        assert_eq!(restored.create_account(0).0.num, r.0.num + 1);
    }

    #[test]
    fn test_restore_rejects_inconsistent_snapshot() {
        let (ledger, _, _) = setup();

        let mut snapshot = ledger.snapshot();
        snapshot.tokens[0].total_supply += 1;
        assert!(matches!(
            LedgerModel::restore(snapshot),
            Err(LedgerError::InvalidSnapshot(_))
        ));

        let mut snapshot = ledger.snapshot();
        snapshot.next_entity_num = FIRST_ENTITY_NUM;
        assert!(matches!(
            LedgerModel::restore(snapshot),
            Err(LedgerError::InvalidSnapshot(_))
        ));

        let mut snapshot = ledger.snapshot();
        snapshot.accounts.clear();
        assert!(matches!(
            LedgerModel::restore(snapshot),
            Err(LedgerError::InvalidSnapshot(_))
        ));
    }
}
