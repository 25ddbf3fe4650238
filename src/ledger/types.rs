//! Identifiers and unit conversions shared by the ledger model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Largest supported decimal precision (10^18 still fits in a `u64`)
pub const MAX_DECIMALS: u8 = 18;

/// First entity number handed out by a fresh ledger
pub const FIRST_ENTITY_NUM: u64 = 1001;

/// A `shard.realm.num` entity identifier, rendered as `0.0.1001`
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct EntityId {
    pub shard: u64,
    pub realm: u64,
    pub num: u64,
}

impl EntityId {
    /// Entity in the default shard and realm
    pub fn new(num: u64) -> Self {
        Self {
            shard: 0,
            realm: 0,
            num,
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.shard, self.realm, self.num)
    }
}

impl FromStr for EntityId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split('.').collect();
        if parts.len() != 3 {
            return Err(format!("expected shard.realm.num, got '{}'", s));
        }

        let parse = |part: &str| {
            part.parse::<u64>()
                .map_err(|_| format!("invalid entity id component '{}' in '{}'", part, s))
        };

        Ok(Self {
            shard: parse(parts[0])?,
            realm: parse(parts[1])?,
            num: parse(parts[2])?,
        })
    }
}

impl From<EntityId> for String {
    fn from(id: EntityId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for EntityId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Identifier of an account
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(pub EntityId);

/// Identifier of a token
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenId(pub EntityId);

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for AccountId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(AccountId)
    }
}

impl FromStr for TokenId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(TokenId)
    }
}

/// `10^decimals`, or `None` past [`MAX_DECIMALS`]
pub fn unit_scale(decimals: u8) -> Option<u64> {
    if decimals > MAX_DECIMALS {
        return None;
    }
    10u64.checked_pow(decimals as u32)
}

/// Convert a whole-token amount to smallest units: `whole * 10^decimals`
pub fn to_smallest_unit(whole: u64, decimals: u8) -> Option<u64> {
    unit_scale(decimals)?.checked_mul(whole)
}

/// Render smallest units as a whole-token amount with exactly `decimals`
/// fractional digits (`95000` at 2 decimals is `"950.00"`).
pub fn format_units(amount: u64, decimals: u8) -> String {
    let decimals = decimals.min(MAX_DECIMALS);
    let scale = 10u64.pow(decimals as u32);

    if decimals == 0 {
        return amount.to_string();
    }

    format!(
        "{}.{:0width$}",
        amount / scale,
        amount % scale,
        width = decimals as usize
    )
}
