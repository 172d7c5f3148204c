//! Double-entry ledger postings
//!
//! A transfer debits one account and credits another by the same amount
//! inside whatever transaction it is called under; either both entries
//! and both balance updates commit or none do. Deposits and withdrawals
//! are single-entry movements across the system boundary.

use std::sync::Arc;

use persistence::{Store, StoreError, Tx};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::debug;
use types::ids::AccountId;
use types::ledger::{EntryRef, LedgerEntry};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("insufficient balance on {account_id}: required {required}, available {available}")]
    InsufficientBalance {
        account_id: AccountId,
        required: Decimal,
        available: Decimal,
    },

    #[error("posting amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),
}

/// Debit `from` by `debit_amount` and credit `to` by `credit_amount` on
/// an open transaction.
///
/// The amounts are independent so fee-bearing transfers are
/// representable; plain transfers pass the same value twice. The debit
/// is checked against the payer's full balance; a shortfall fails the
/// posting and, through the transaction, discards everything staged so
/// far.
pub fn post_transfer(
    tx: &mut Tx<'_>,
    from: AccountId,
    debit_amount: Decimal,
    to: AccountId,
    credit_amount: Decimal,
    reference: EntryRef,
    timestamp: i64,
) -> Result<(), LedgerError> {
    if debit_amount <= Decimal::ZERO {
        return Err(LedgerError::NonPositiveAmount(debit_amount));
    }
    if credit_amount <= Decimal::ZERO {
        return Err(LedgerError::NonPositiveAmount(credit_amount));
    }

    let mut payer = tx.account(&from)?;
    if debit_amount > payer.balance {
        return Err(LedgerError::InsufficientBalance {
            account_id: from,
            required: debit_amount,
            available: payer.balance,
        });
    }

    let payer_after = payer.apply_posting(-debit_amount, timestamp);
    tx.append_ledger(LedgerEntry::new(from, -debit_amount, payer_after, reference, timestamp));
    tx.put_account(payer);

    let mut payee = tx.account(&to)?;
    let payee_after = payee.apply_posting(credit_amount, timestamp);
    tx.append_ledger(LedgerEntry::new(to, credit_amount, payee_after, reference, timestamp));
    tx.put_account(payee);

    debug!(%from, %to, %debit_amount, %credit_amount, "ledger transfer posted");
    Ok(())
}

/// Credit an account from outside the system (single entry).
pub fn post_deposit(
    tx: &mut Tx<'_>,
    account_id: AccountId,
    amount: Decimal,
    timestamp: i64,
) -> Result<(), LedgerError> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::NonPositiveAmount(amount));
    }

    let mut account = tx.account(&account_id)?;
    let after = account.apply_posting(amount, timestamp);
    tx.append_ledger(LedgerEntry::new(account_id, amount, after, EntryRef::Deposit, timestamp));
    tx.put_account(account);
    Ok(())
}

/// Debit an account out of the system (single entry).
pub fn post_withdrawal(
    tx: &mut Tx<'_>,
    account_id: AccountId,
    amount: Decimal,
    timestamp: i64,
) -> Result<(), LedgerError> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::NonPositiveAmount(amount));
    }

    let mut account = tx.account(&account_id)?;
    if amount > account.free_balance() {
        return Err(LedgerError::InsufficientBalance {
            account_id,
            required: amount,
            available: account.free_balance(),
        });
    }

    let after = account.apply_posting(-amount, timestamp);
    tx.append_ledger(LedgerEntry::new(
        account_id,
        -amount,
        after,
        EntryRef::Withdrawal,
        timestamp,
    ));
    tx.put_account(account);
    Ok(())
}

/// Standalone ledger operations, each running in its own transaction.
#[derive(Clone)]
pub struct LedgerService {
    store: Arc<Store>,
}

impl LedgerService {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    /// Move `amount` from one account to another, both legs equal.
    pub fn transfer(
        &self,
        from: AccountId,
        to: AccountId,
        amount: Decimal,
        reference: EntryRef,
        timestamp: i64,
    ) -> Result<(), LedgerError> {
        self.store
            .transaction(|tx| post_transfer(tx, from, amount, to, amount, reference, timestamp))
    }

    pub fn deposit(
        &self,
        account_id: AccountId,
        amount: Decimal,
        timestamp: i64,
    ) -> Result<(), LedgerError> {
        self.store
            .transaction(|tx| post_deposit(tx, account_id, amount, timestamp))
    }

    pub fn withdraw(
        &self,
        account_id: AccountId,
        amount: Decimal,
        timestamp: i64,
    ) -> Result<(), LedgerError> {
        self.store
            .transaction(|tx| post_withdrawal(tx, account_id, amount, timestamp))
    }

    pub fn balance(&self, account_id: &AccountId) -> Result<Decimal, LedgerError> {
        Ok(self.store.account(account_id)?.balance)
    }

    pub fn entries(&self, account_id: &AccountId) -> Vec<LedgerEntry> {
        self.store.ledger_entries(account_id)
    }
}
