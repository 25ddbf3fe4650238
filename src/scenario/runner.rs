//! Scenario execution
//!
//! Drives a ledger through the full token lifecycle with signed
//! transactions and captures balance checkpoints along the way.

use crate::crypto::{KeyPair, Signer};
use crate::ledger::{to_smallest_unit, AccountId, LedgerError, LedgerModel, TokenId, TransferIntent};
use crate::scenario::config::ScenarioConfig;
use crate::transaction::{
    submit, Receipt, SignedTransaction, SubmitError, Transaction, TransactionBody,
    TransactionError,
};
use serde::Serialize;
use thiserror::Error;

/// Scenario errors
#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error("Step '{step}' failed: {source}")]
    Step {
        step: &'static str,
        #[source]
        source: SubmitError,
    },
    #[error("Transaction error: {0}")]
    TransactionError(#[from] TransactionError),
    #[error("Ledger error: {0}")]
    LedgerError(#[from] LedgerError),
    #[error("Step '{0}' returned a receipt without the expected id")]
    MissingReceiptField(&'static str),
    #[error("Amount of {0} whole tokens does not fit the token's precision")]
    AmountOverflow(u64),
}

/// One account's balance at a checkpoint
#[derive(Debug, Clone, Serialize)]
pub struct BalanceRow {
    pub name: String,
    pub account: AccountId,
    /// Smallest units
    pub units: u64,
    /// Whole tokens with the token's decimals
    pub display: String,
}

/// Balances captured at a named point of the scenario
#[derive(Debug, Clone, Serialize)]
pub struct Checkpoint {
    pub label: String,
    pub symbol: String,
    pub rows: Vec<BalanceRow>,
}

/// Everything the scenario produced
#[derive(Debug)]
pub struct ScenarioReport {
    pub ledger: LedgerModel,
    pub treasury: AccountId,
    pub recipient_a: AccountId,
    pub recipient_b: AccountId,
    pub token: TokenId,
    /// Receipts in submission order, labelled by step
    pub receipts: Vec<(&'static str, Receipt)>,
    pub checkpoints: Vec<Checkpoint>,
}

struct Runner<'a> {
    config: &'a ScenarioConfig,
    ledger: LedgerModel,
    receipts: Vec<(&'static str, Receipt)>,
}

impl<'a> Runner<'a> {
    fn submit(
        &mut self,
        step: &'static str,
        signed: SignedTransaction,
    ) -> Result<Receipt, ScenarioError> {
        let receipt = submit(&mut self.ledger, &signed)
            .map_err(|source| ScenarioError::Step { step, source })?;
        log::info!("{}: {} ({})", step, receipt.kind, &receipt.transaction_id[..16]);
        self.receipts.push((step, receipt.clone()));
        Ok(receipt)
    }

    fn units(&self, whole: u64) -> Result<i64, ScenarioError> {
        to_smallest_unit(whole, self.config.decimals)
            .and_then(|units| i64::try_from(units).ok())
            .ok_or(ScenarioError::AmountOverflow(whole))
    }

    fn create_account(
        &mut self,
        step: &'static str,
        payer: &dyn Signer,
        key: &dyn Signer,
        initial_balance: u64,
    ) -> Result<AccountId, ScenarioError> {
        let signed = Transaction::new(TransactionBody::AccountCreate {
            initial_balance,
            key: key.public_key_hex(),
        })
        .sign(payer)?;
        self.submit(step, signed)?
            .account_id
            .ok_or(ScenarioError::MissingReceiptField(step))
    }

    fn associate(
        &mut self,
        step: &'static str,
        payer: &dyn Signer,
        account: AccountId,
        account_key: &dyn Signer,
        token: TokenId,
    ) -> Result<(), ScenarioError> {
        let signed = Transaction::new(TransactionBody::TokenAssociate {
            account,
            tokens: vec![token],
        })
        .sign(payer)?
        .sign_with(account_key)?;
        self.submit(step, signed)?;
        Ok(())
    }

    fn transfer(
        &mut self,
        step: &'static str,
        signer: &dyn Signer,
        token: TokenId,
        intent: TransferIntent,
    ) -> Result<(), ScenarioError> {
        let signed = Transaction::new(TransactionBody::Transfer { token, intent }).sign(signer)?;
        self.submit(step, signed)?;
        Ok(())
    }

    fn checkpoint(
        &self,
        label: &str,
        token: TokenId,
        accounts: &[(&str, AccountId)],
    ) -> Result<Checkpoint, ScenarioError> {
        let rows = accounts
            .iter()
            .map(|(name, account)| {
                Ok(BalanceRow {
                    name: name.to_string(),
                    account: *account,
                    units: self.ledger.balance_of(*account, token),
                    display: self.ledger.display_balance(*account, token)?,
                })
            })
            .collect::<Result<Vec<_>, LedgerError>>()?;

        Ok(Checkpoint {
            label: label.to_string(),
            symbol: self.config.token_symbol.clone(),
            rows,
        })
    }
}

/// Run the distribution scenario on a fresh ledger.
///
/// `operator` pays for and signs every transaction and controls the
/// treasury. Recipient keys and the token's supply key are generated.
pub fn run_scenario(
    config: &ScenarioConfig,
    operator: &dyn Signer,
) -> Result<ScenarioReport, ScenarioError> {
    let recipient_a_key = KeyPair::generate();
    let recipient_b_key = KeyPair::generate();
    let supply_key = KeyPair::generate();

    let mut runner = Runner {
        config,
        ledger: LedgerModel::new(),
        receipts: Vec::new(),
    };

    let treasury = runner.create_account(
        "create treasury",
        operator,
        operator,
        config.treasury_initial_balance,
    )?;
    let recipient_a = runner.create_account(
        "create recipient A",
        operator,
        &recipient_a_key,
        config.recipient_initial_balance,
    )?;
    let recipient_b = runner.create_account(
        "create recipient B",
        operator,
        &recipient_b_key,
        config.recipient_initial_balance,
    )?;

    // Token creation is signed by the treasury key, which is the operator
    let create = Transaction::new(TransactionBody::TokenCreate {
        name: config.token_name.clone(),
        symbol: config.token_symbol.clone(),
        decimals: config.decimals,
        initial_supply: config.initial_supply,
        treasury,
        supply_type: config.supply_type,
        supply_key: Some(supply_key.public_key_hex()),
    })
    .sign(operator)?;
    let token = runner
        .submit("create token", create)?
        .token_id
        .ok_or(ScenarioError::MissingReceiptField("create token"))?;

    runner.associate("associate recipient A", operator, recipient_a, &recipient_a_key, token)?;

    let first = runner.units(config.initial_transfer)?;
    runner.transfer(
        "initial transfer",
        operator,
        token,
        TransferIntent::new()
            .with(treasury, -first)
            .with(recipient_a, first),
    )?;

    let mut checkpoints = vec![runner.checkpoint(
        "Verification",
        token,
        &[("Treasury", treasury), ("Recipient A", recipient_a)],
    )?];

    // Minting requires the supply key, not the treasury key
    let mint = Transaction::new(TransactionBody::TokenMint {
        token,
        amount: config.mint_amount,
    })
    .sign(operator)?
    .sign_with(&supply_key)?;
    runner.submit("mint", mint)?;

    runner.associate("associate recipient B", operator, recipient_b, &recipient_b_key, token)?;

    let bulk = runner.units(config.bulk_amount)?;
    runner.transfer(
        "bulk distribution",
        operator,
        token,
        TransferIntent::distribute(treasury, &[(recipient_a, bulk), (recipient_b, bulk)]),
    )?;

    checkpoints.push(runner.checkpoint(
        "Final verification",
        token,
        &[
            ("Treasury", treasury),
            ("Recipient A", recipient_a),
            ("Recipient B", recipient_b),
        ],
    )?);

    Ok(ScenarioReport {
        ledger: runner.ledger,
        treasury,
        recipient_a,
        recipient_b,
        token,
        receipts: runner.receipts,
        checkpoints,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn displays(checkpoint: &Checkpoint) -> Vec<&str> {
        checkpoint.rows.iter().map(|r| r.display.as_str()).collect()
    }

    #[test]
    fn test_default_scenario_balances() {
        let operator = KeyPair::generate();
        let report = run_scenario(&ScenarioConfig::default(), &operator).unwrap();
        let ledger = &report.ledger;

        assert_eq!(report.checkpoints.len(), 2);
        assert_eq!(displays(&report.checkpoints[0]), vec!["950.00", "50.00"]);
        assert_eq!(
            displays(&report.checkpoints[1]),
            vec!["1250.00", "150.00", "100.00"]
        );

        assert_eq!(ledger.balance_of(report.treasury, report.token), 125_000);
        assert_eq!(ledger.balance_of(report.recipient_a, report.token), 15_000);
        assert_eq!(ledger.balance_of(report.recipient_b, report.token), 10_000);
        assert_eq!(ledger.total_supply(report.token).unwrap(), 150_000);
    }

    #[test]
    fn test_scenario_receipts_in_order() {
        let operator = KeyPair::generate();
        let report = run_scenario(&ScenarioConfig::default(), &operator).unwrap();

        let steps: Vec<&str> = report.receipts.iter().map(|(step, _)| *step).collect();
        assert_eq!(
            steps,
            vec![
                "create treasury",
                "create recipient A",
                "create recipient B",
                "create token",
                "associate recipient A",
                "initial transfer",
                "mint",
                "associate recipient B",
                "bulk distribution",
            ]
        );

        let mint = &report.receipts[6].1;
        assert_eq!(mint.total_supply, Some(150_000));
    }

    #[test]
    fn test_scenario_with_other_precision() {
        let config = ScenarioConfig {
            decimals: 0,
            initial_supply: 10,
            initial_transfer: 4,
            mint_amount: 6,
            bulk_amount: 5,
            ..ScenarioConfig::default()
        };
        let report = run_scenario(&config, &KeyPair::generate()).unwrap();

        assert_eq!(displays(&report.checkpoints[1]), vec!["2", "9", "5"]);
    }

    #[test]
    fn test_scenario_overdraft_fails_at_step() {
        let config = ScenarioConfig {
            initial_supply: 10,
            initial_transfer: 50,
            ..ScenarioConfig::default()
        };

        let result = run_scenario(&config, &KeyPair::generate());
        assert!(matches!(
            result,
            Err(ScenarioError::Step {
                step: "initial transfer",
                source: SubmitError::Ledger(LedgerError::InsufficientBalance { .. })
            })
        ));
    }
}
