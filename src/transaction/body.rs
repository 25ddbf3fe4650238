//! Immutable transaction values and their signatures
//!
//! A [`Transaction`] is built once from a [`TransactionBody`] and never
//! mutated afterwards. Signing produces a separate [`SignedTransaction`]
//! that carries the signatures next to the untouched transaction.

use crate::crypto::{public_key_from_hex, sha256, sha256_hex, verify_signature, KeyError, Signer};
use crate::ledger::{AccountId, SupplyType, TokenId, TransferIntent};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Transaction-related errors
#[derive(Error, Debug)]
pub enum TransactionError {
    #[error("Crypto error: {0}")]
    CryptoError(#[from] KeyError),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("Invalid signature encoding")]
    InvalidSignature,
}

/// The operation a transaction performs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransactionBody {
    /// Create an account controlled by `key`
    AccountCreate {
        initial_balance: u64,
        /// Hex public key of the new account
        key: String,
    },
    /// Create a fungible token
    TokenCreate {
        name: String,
        symbol: String,
        decimals: u8,
        /// Initial supply in whole tokens
        initial_supply: u64,
        treasury: AccountId,
        supply_type: SupplyType,
        /// Hex public key allowed to mint
        supply_key: Option<String>,
    },
    /// Associate an account with one or more tokens
    TokenAssociate {
        account: AccountId,
        tokens: Vec<TokenId>,
    },
    /// Zero-sum token transfer
    Transfer {
        token: TokenId,
        intent: TransferIntent,
    },
    /// Mint whole tokens into the treasury
    TokenMint { token: TokenId, amount: u64 },
}

impl TransactionBody {
    /// Short name for logs and receipts
    pub fn kind(&self) -> &'static str {
        match self {
            TransactionBody::AccountCreate { .. } => "AccountCreate",
            TransactionBody::TokenCreate { .. } => "TokenCreate",
            TransactionBody::TokenAssociate { .. } => "TokenAssociate",
            TransactionBody::Transfer { .. } => "Transfer",
            TransactionBody::TokenMint { .. } => "TokenMint",
        }
    }
}

/// A transaction ready to be signed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub body: TransactionBody,
    /// Distinguishes otherwise identical transactions
    pub valid_start: DateTime<Utc>,
    #[serde(default)]
    pub memo: Option<String>,
}

impl Transaction {
    /// Wrap a body, stamping it with the current time
    pub fn new(body: TransactionBody) -> Self {
        Self {
            body,
            valid_start: Utc::now(),
            memo: None,
        }
    }

    /// Same transaction with a memo attached
    pub fn with_memo(self, memo: &str) -> Self {
        Self {
            memo: Some(memo.to_string()),
            ..self
        }
    }

    /// Canonical bytes covered by signatures
    pub fn signing_data(&self) -> Result<Vec<u8>, TransactionError> {
        let encoded = serde_json::to_vec(self)?;
        Ok(sha256(&encoded))
    }

    /// Hex SHA-256 of the canonical encoding
    pub fn transaction_id(&self) -> Result<String, TransactionError> {
        Ok(sha256_hex(&serde_json::to_vec(self)?))
    }

    /// Sign with a first signer
    pub fn sign(self, signer: &dyn Signer) -> Result<SignedTransaction, TransactionError> {
        SignedTransaction {
            transaction: self,
            signatures: Vec::new(),
        }
        .sign_with(signer)
    }
}

/// A signature from one signer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignaturePair {
    /// Hex public key of the signer
    pub public_key: String,
    /// Hex compact signature
    pub signature: String,
}

/// A transaction plus the signatures collected for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTransaction {
    pub transaction: Transaction,
    pub signatures: Vec<SignaturePair>,
}

impl SignedTransaction {
    /// Add another signature. Signing twice with the same key is a no-op.
    pub fn sign_with(mut self, signer: &dyn Signer) -> Result<Self, TransactionError> {
        let public_key = signer.public_key_hex();
        if self.is_signed_by(&public_key) {
            return Ok(self);
        }

        let signature = signer.sign(&self.transaction.signing_data()?)?;
        self.signatures.push(SignaturePair {
            public_key,
            signature: hex::encode(signature),
        });
        Ok(self)
    }

    /// Whether a signature from `public_key` is attached
    pub fn is_signed_by(&self, public_key: &str) -> bool {
        self.signatures.iter().any(|s| s.public_key == public_key)
    }

    /// Verify every attached secp256k1 signature
    pub fn verify_signatures(&self) -> Result<bool, TransactionError> {
        let signing_data = self.transaction.signing_data()?;

        for pair in &self.signatures {
            let public_key = public_key_from_hex(&pair.public_key)?;
            let signature =
                hex::decode(&pair.signature).map_err(|_| TransactionError::InvalidSignature)?;

            if !verify_signature(&public_key, &signing_data, &signature)? {
                return Ok(false);
            }
        }

        Ok(true)
    }
}
