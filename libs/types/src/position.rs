//! Signed per-(account, symbol) position tracking
//!
//! Quantity is signed: positive is long, negative is short. The spot risk
//! checks keep user positions non-negative, but the math here handles the
//! general signed case so reductions and flips settle identically.

use crate::ids::{AccountId, MarketId};
use crate::numeric::{Price, Quantity};
use crate::order::Side;
use rust_decimal::prelude::Signed;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub account_id: AccountId,
    pub symbol: MarketId,
    /// Signed net quantity: + long, − short
    pub quantity: Decimal,
    /// Volume-weighted average entry price; zero while flat
    pub entry_price: Decimal,
    pub realized_pnl: Decimal,
    pub unrealized_pnl: Decimal,
    pub opened_at: i64,
    pub updated_at: i64,
    pub version: u64,
}

impl Position {
    /// A flat (zero-quantity) position, the upsert starting point.
    pub fn flat(account_id: AccountId, symbol: MarketId, timestamp: i64) -> Self {
        Self {
            account_id,
            symbol,
            quantity: Decimal::ZERO,
            entry_price: Decimal::ZERO,
            realized_pnl: Decimal::ZERO,
            unrealized_pnl: Decimal::ZERO,
            opened_at: timestamp,
            updated_at: timestamp,
            version: 0,
        }
    }

    pub fn is_flat(&self) -> bool {
        self.quantity.is_zero()
    }

    /// Apply one fill as a signed delta (+ buy, − sell).
    ///
    /// Increasing the position re-averages the entry price by volume;
    /// reducing it realizes P&L on the closed quantity at
    /// `(fill − entry) × closed × direction`. A fill crossing through
    /// zero closes the old position and opens the rest at the fill price.
    pub fn apply_fill(&mut self, side: Side, fill_quantity: Quantity, price: Price, timestamp: i64) {
        let delta = side.sign() * fill_quantity.as_decimal();
        let fill_price = price.as_decimal();
        let old_qty = self.quantity;
        let new_qty = old_qty + delta;

        if old_qty.is_zero() || old_qty.signum() == delta.signum() {
            // Extending (or opening): volume-weighted average entry
            let old_abs = old_qty.abs();
            let added = delta.abs();
            self.entry_price =
                (self.entry_price * old_abs + fill_price * added) / (old_abs + added);
        } else if delta.abs() <= old_qty.abs() {
            // Reducing: realize P&L on the closed quantity
            let closed = delta.abs();
            self.realized_pnl += (fill_price - self.entry_price) * closed * old_qty.signum();
            if new_qty.is_zero() {
                self.entry_price = Decimal::ZERO;
            }
        } else {
            // Flip through zero: close everything, re-open the remainder
            let closed = old_qty.abs();
            self.realized_pnl += (fill_price - self.entry_price) * closed * old_qty.signum();
            self.entry_price = fill_price;
        }

        self.quantity = new_qty;
        self.unrealized_pnl = (fill_price - self.entry_price) * self.quantity;
        self.updated_at = timestamp;
        self.version += 1;
    }

    /// Recompute unrealized P&L against a reference price.
    pub fn mark_to_market(&mut self, mark: Price, timestamp: i64) {
        self.unrealized_pnl = (mark.as_decimal() - self.entry_price) * self.quantity;
        self.updated_at = timestamp;
        self.version += 1;
    }
}
