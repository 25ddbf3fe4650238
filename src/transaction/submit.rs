//! Submission of signed transactions to a ledger
//!
//! [`submit`] is the single entry point that turns a signed transaction
//! into a ledger mutation and a [`Receipt`].

use crate::ledger::{AccountId, LedgerError, LedgerModel, TokenId};
use crate::transaction::body::{SignedTransaction, TransactionBody, TransactionError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Submission errors
#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("Transaction {0} carries no signatures")]
    Unsigned(String),
    #[error("Transaction {0} has an invalid signature")]
    InvalidSignature(String),
    #[error("Transaction error: {0}")]
    TransactionError(#[from] TransactionError),
    #[error("Ledger rejected transaction: {0}")]
    Ledger(#[from] LedgerError),
}

/// Outcome status of an applied transaction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReceiptStatus {
    Success,
}

/// Receipt returned for an applied transaction
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Receipt {
    pub transaction_id: String,
    pub kind: String,
    pub status: ReceiptStatus,
    /// Set by account creation
    pub account_id: Option<AccountId>,
    /// Set by token creation
    pub token_id: Option<TokenId>,
    /// Set by token creation and mint
    pub total_supply: Option<u64>,
    pub consensus_timestamp: DateTime<Utc>,
}

impl Receipt {
    fn success(transaction_id: String, body: &TransactionBody) -> Self {
        Self {
            transaction_id,
            kind: body.kind().to_string(),
            status: ReceiptStatus::Success,
            account_id: None,
            token_id: None,
            total_supply: None,
            consensus_timestamp: Utc::now(),
        }
    }
}

/// Apply a signed transaction to the ledger.
///
/// Signatures must be present and cryptographically valid. Whether the
/// signers are *authorized* is the caller's concern; the ledger performs no
/// authorization of its own.
pub fn submit(ledger: &mut LedgerModel, signed: &SignedTransaction) -> Result<Receipt, SubmitError> {
    let transaction_id = signed.transaction.transaction_id()?;

    if signed.signatures.is_empty() {
        return Err(SubmitError::Unsigned(transaction_id));
    }
    if !signed.verify_signatures()? {
        log::warn!("Rejected transaction {}: bad signature", transaction_id);
        return Err(SubmitError::InvalidSignature(transaction_id));
    }

    let body = &signed.transaction.body;
    let mut receipt = Receipt::success(transaction_id, body);

    match body {
        TransactionBody::AccountCreate {
            initial_balance, ..
        } => {
            receipt.account_id = Some(ledger.create_account(*initial_balance));
        }
        TransactionBody::TokenCreate {
            name,
            symbol,
            decimals,
            initial_supply,
            treasury,
            supply_type,
            ..
        } => {
            let token = ledger.create_token(
                name,
                symbol,
                *decimals,
                *treasury,
                *initial_supply,
                *supply_type,
            )?;
            receipt.token_id = Some(token);
            receipt.total_supply = Some(ledger.total_supply(token)?);
        }
        TransactionBody::TokenAssociate { account, tokens } => {
            // Validate every pair first so a bad token leaves no partial association
            for token in tokens {
                if ledger.token(*token).is_none() {
                    return Err(LedgerError::UnknownToken(*token).into());
                }
            }
            for token in tokens {
                ledger.associate(*account, *token)?;
            }
        }
        TransactionBody::Transfer { token, intent } => {
            ledger.transfer(*token, intent)?;
        }
        TransactionBody::TokenMint { token, amount } => {
            receipt.total_supply = Some(ledger.mint(*token, *amount)?);
        }
    }

    log::debug!("{} {} succeeded", receipt.kind, receipt.transaction_id);
    Ok(receipt)
}
