//! Append-only double-entry ledger rows
//!
//! Every value movement is a debit entry on one account and a credit
//! entry on another, each carrying the resulting balance snapshot.
//! Entries are immutable once written.

use crate::ids::{AccountId, EntryId, OrderId, TradeId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// What a ledger entry settles for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id")]
pub enum EntryRef {
    /// One leg of a trade settlement
    Trade(TradeId),
    /// A non-trade movement attributed to an order (e.g., a fee)
    Order(OrderId),
    /// External funding into the system
    Deposit,
    /// External withdrawal out of the system
    Withdrawal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub entry_id: EntryId,
    pub account_id: AccountId,
    /// Signed amount: negative for debits, positive for credits
    pub amount: Decimal,
    /// The account's balance immediately after this entry was applied
    pub balance_after: Decimal,
    pub reference: EntryRef,
    pub created_at: i64, // Unix nanos
}

impl LedgerEntry {
    pub fn new(
        account_id: AccountId,
        amount: Decimal,
        balance_after: Decimal,
        reference: EntryRef,
        created_at: i64,
    ) -> Self {
        Self {
            entry_id: EntryId::new(),
            account_id,
            amount,
            balance_after,
            reference,
            created_at,
        }
    }

    pub fn is_debit(&self) -> bool {
        self.amount < Decimal::ZERO
    }

    pub fn is_credit(&self) -> bool {
        self.amount > Decimal::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debit_credit_classification() {
        let acct = AccountId::new();
        let debit = LedgerEntry::new(acct, Decimal::from(-100), Decimal::from(900), EntryRef::Deposit, 1);
        let credit = LedgerEntry::new(acct, Decimal::from(100), Decimal::from(1_000), EntryRef::Deposit, 1);

        assert!(debit.is_debit());
        assert!(!debit.is_credit());
        assert!(credit.is_credit());
    }

    #[test]
    fn test_serde_round_trip() {
        let entry = LedgerEntry::new(
            AccountId::new(),
            Decimal::from(-250),
            Decimal::from(750),
            EntryRef::Trade(TradeId::new()),
            1_708_123_456_789_000_000,
        );
        let json = serde_json::to_string(&entry).unwrap();
        let back: LedgerEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(entry, back);
    }
}
