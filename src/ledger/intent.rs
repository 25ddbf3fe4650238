//! Transfer intents
//!
//! A transfer intent lists signed balance adjustments for a single token.
//! Negative deltas debit an account, positive deltas credit it, and the
//! deltas of a valid intent sum to zero.

use crate::ledger::types::AccountId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One balance adjustment inside a transfer intent
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenDelta {
    pub account: AccountId,
    /// Signed amount in smallest units
    pub delta: i64,
}

/// Ordered set of balance adjustments for one token
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferIntent {
    deltas: Vec<TokenDelta>,
}

impl TransferIntent {
    /// Create an empty intent
    pub fn new() -> Self {
        Self { deltas: Vec::new() }
    }

    /// Add an adjustment, returning the extended intent
    pub fn with(mut self, account: AccountId, delta: i64) -> Self {
        self.deltas.push(TokenDelta { account, delta });
        self
    }

    /// Debit `from` by the sum of all credits and credit each recipient.
    ///
    /// The debit is derived from the credits themselves so that unequal
    /// splits always balance.
    pub fn distribute(from: AccountId, credits: &[(AccountId, i64)]) -> Self {
        // Saturates on overflow; the resulting intent then fails the balance check
        let total = credits
            .iter()
            .fold(0i64, |acc, (_, amount)| acc.saturating_add(*amount));
        credits
            .iter()
            .fold(Self::new().with(from, -total), |intent, (account, amount)| {
                intent.with(*account, *amount)
            })
    }

    /// Adjustments in insertion order
    pub fn deltas(&self) -> &[TokenDelta] {
        &self.deltas
    }

    /// Exact sum of all deltas
    pub fn sum(&self) -> i128 {
        self.deltas.iter().map(|d| d.delta as i128).sum()
    }

    /// Whether the deltas sum to zero
    pub fn is_balanced(&self) -> bool {
        self.sum() == 0
    }

    /// Net delta per account, merging repeated entries
    pub fn net_deltas(&self) -> BTreeMap<AccountId, i128> {
        let mut net = BTreeMap::new();
        for d in &self.deltas {
            *net.entry(d.account).or_insert(0i128) += d.delta as i128;
        }
        net
    }
}

impl FromIterator<(AccountId, i64)> for TransferIntent {
    fn from_iter<I: IntoIterator<Item = (AccountId, i64)>>(iter: I) -> Self {
        Self {
            deltas: iter
                .into_iter()
                .map(|(account, delta)| TokenDelta { account, delta })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::types::EntityId;

    fn account(num: u64) -> AccountId {
        AccountId(EntityId::new(num))
    }

    #[test]
    fn test_balanced_intent() {
        let intent = TransferIntent::new()
            .with(account(1001), -5_000)
            .with(account(1002), 5_000);

        assert!(intent.is_balanced());
        assert_eq!(intent.deltas().len(), 2);
    }

    #[test]
    fn test_unbalanced_intent() {
        let intent: TransferIntent = vec![(account(1001), -5_000), (account(1002), 4_999)]
            .into_iter()
            .collect();

        assert!(!intent.is_balanced());
        assert_eq!(intent.sum(), -1);
    }

    #[test]
    fn test_distribute_sums_credits() {
        let intent =
            TransferIntent::distribute(account(1001), &[(account(1002), 7_000), (account(1003), 3_000)]);

        assert!(intent.is_balanced());
        assert_eq!(intent.deltas()[0].delta, -10_000);
    }

    #[test]
    fn test_net_deltas_merge_repeated_accounts() {
        let intent = TransferIntent::new()
            .with(account(1001), -300)
            .with(account(1002), 500)
            .with(account(1001), -200);

        let net = intent.net_deltas();
        assert_eq!(net[&account(1001)], -500);
        assert_eq!(net[&account(1002)], 500);
    }

    #[test]
    fn test_sum_does_not_overflow() {
        let intent = TransferIntent::new()
            .with(account(1001), i64::MAX)
            .with(account(1002), i64::MAX);
        assert_eq!(intent.sum(), 2 * i64::MAX as i128);
    }
}
