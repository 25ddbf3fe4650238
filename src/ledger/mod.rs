//! In-memory ledger of accounts and fungible tokens
//!
//! Reproduces the balance arithmetic of a token service:
//! - Accounts with a base-currency balance
//! - Tokens with fixed decimals and a treasury account
//! - Association as a precondition for holding a token
//! - Zero-sum multi-party transfers
//! - Minting into the treasury
//!
//! # Example
//!
//! ```
//! use token_ledger::ledger::{LedgerModel, SupplyType, TransferIntent};
//!
//! let mut ledger = LedgerModel::new();
//! let treasury = ledger.create_account(10_000);
//! let token = ledger
//!     .create_token("MyToken", "MYT", 2, treasury, 1000, SupplyType::Infinite)
//!     .unwrap();
//!
//! let recipient = ledger.create_account(1000);
//! ledger.associate(recipient, token).unwrap();
//!
//! let intent = TransferIntent::new()
//!     .with(treasury, -5_000)
//!     .with(recipient, 5_000);
//! ledger.transfer(token, &intent).unwrap();
//!
//! assert_eq!(ledger.display_balance(treasury, token).unwrap(), "950.00");
//! assert_eq!(ledger.display_balance(recipient, token).unwrap(), "50.00");
//! ```

pub mod account;
pub mod intent;
pub mod model;
pub mod token;
pub mod types;

pub use account::Account;
pub use intent::{TokenDelta, TransferIntent};
pub use model::{LedgerError, LedgerEvent, LedgerEventKind, LedgerModel, LedgerSnapshot};
pub use token::{SupplyType, Token, TokenType};
pub use types::{format_units, to_smallest_unit, AccountId, EntityId, TokenId};
