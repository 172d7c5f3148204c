//! Single-currency account model
//!
//! An account's `balance` is a cached projection of its ledger entries;
//! it is only ever mutated through ledger postings. The ledger is the
//! source of truth, and `balance == Σ entries` holds exactly.

use crate::ids::{AccountId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Account status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountStatus {
    /// Active and can trade
    Active,
    /// Temporarily suspended
    Suspended,
    /// Permanently closed
    Closed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub account_id: AccountId,
    pub owner: UserId,
    /// Currency this account is denominated in (e.g., "USD")
    pub currency: String,
    pub balance: Decimal,
    pub locked: Decimal,
    pub status: AccountStatus,
    pub created_at: i64,
    pub updated_at: i64,
    pub version: u64,
}

impl Account {
    pub fn new(owner: UserId, currency: impl Into<String>, timestamp: i64) -> Self {
        Self {
            account_id: AccountId::new(),
            owner,
            currency: currency.into(),
            balance: Decimal::ZERO,
            locked: Decimal::ZERO,
            status: AccountStatus::Active,
            created_at: timestamp,
            updated_at: timestamp,
            version: 0,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.status, AccountStatus::Active)
    }

    /// Balance available for new orders: total minus locked.
    pub fn free_balance(&self) -> Decimal {
        self.balance - self.locked
    }

    /// Apply a signed ledger posting and return the resulting balance.
    ///
    /// Only the ledger calls this; every application is paired with an
    /// appended entry recording the same amount and resulting balance.
    pub fn apply_posting(&mut self, amount: Decimal, timestamp: i64) -> Decimal {
        self.balance += amount;
        self.updated_at = timestamp;
        self.version += 1;
        self.balance
    }

    /// Lock a portion of the free balance.
    ///
    /// # Panics
    /// Panics if the amount is negative or exceeds the free balance.
    pub fn lock(&mut self, amount: Decimal, timestamp: i64) {
        assert!(amount >= Decimal::ZERO, "lock amount must be non-negative");
        assert!(amount <= self.free_balance(), "insufficient free balance to lock");

        self.locked += amount;
        self.updated_at = timestamp;
        self.version += 1;
    }

    /// Release previously locked funds.
    ///
    /// # Panics
    /// Panics if the amount exceeds the locked amount.
    pub fn unlock(&mut self, amount: Decimal, timestamp: i64) {
        assert!(amount >= Decimal::ZERO, "unlock amount must be non-negative");
        assert!(amount <= self.locked, "insufficient locked balance");

        self.locked -= amount;
        self.updated_at = timestamp;
        self.version += 1;
    }
}
