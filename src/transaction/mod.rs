//! Signed transactions against the ledger
//!
//! Every operation is described by an immutable [`TransactionBody`], signed
//! through the [`Signer`](crate::crypto::Signer) capability, and applied by
//! the single [`submit`] function.
//!
//! # Example
//!
//! ```
//! use token_ledger::crypto::{KeyPair, Signer};
//! use token_ledger::ledger::LedgerModel;
//! use token_ledger::transaction::{submit, Transaction, TransactionBody};
//!
//! let mut ledger = LedgerModel::new();
//! let key = KeyPair::generate();
//!
//! let signed = Transaction::new(TransactionBody::AccountCreate {
//!     initial_balance: 1000,
//!     key: key.public_key_hex(),
//! })
//! .sign(&key)
//! .unwrap();
//!
//! let receipt = submit(&mut ledger, &signed).unwrap();
//! assert!(receipt.account_id.is_some());
//! ```

pub mod body;
pub mod submit;

pub use body::{SignaturePair, SignedTransaction, Transaction, TransactionBody, TransactionError};
pub use submit::{submit, Receipt, ReceiptStatus, SubmitError};
