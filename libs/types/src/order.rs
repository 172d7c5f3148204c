//! Order lifecycle types
//!
//! An order is created as `New`, accumulates fills monotonically, and ends
//! in exactly one of the terminal states `Filled`, `Cancelled`, or
//! `Rejected`.

use crate::ids::{AccountId, MarketId, OrderId};
use crate::numeric::{Price, Quantity};
use serde::{Deserialize, Serialize};

/// Order side (buyer or seller)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// Buy order (bid)
    Buy,
    /// Sell order (ask)
    Sell,
}

impl Side {
    pub fn opposite(&self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }

    /// Signed direction: +1 for buys, -1 for sells.
    pub fn sign(&self) -> rust_decimal::Decimal {
        match self {
            Side::Buy => rust_decimal::Decimal::ONE,
            Side::Sell => -rust_decimal::Decimal::ONE,
        }
    }
}

/// Order type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderType {
    /// Rests at its limit price when not immediately matched
    Limit,
    /// Consumes opposite liquidity and never rests
    Market,
}

/// Order status
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "state", content = "reason")]
pub enum OrderStatus {
    /// Accepted, no fills yet
    #[serde(rename = "NEW")]
    New,

    /// At least one fill, quantity remaining
    #[serde(rename = "PARTIALLY_FILLED")]
    PartiallyFilled,

    /// Completely matched (terminal)
    #[serde(rename = "FILLED")]
    Filled,

    /// Cancelled; prior fills are retained (terminal)
    #[serde(rename = "CANCELLED")]
    Cancelled(CancelReason),

    /// Failed validation or risk checks (terminal)
    #[serde(rename = "REJECTED")]
    Rejected(RejectReason),
}

impl OrderStatus {
    /// Check if status is terminal (no further transitions possible)
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Filled | OrderStatus::Cancelled(_) | OrderStatus::Rejected(_)
        )
    }

    /// Open orders are the ones reconstructed into the book on restart.
    pub fn is_open(&self) -> bool {
        matches!(self, OrderStatus::New | OrderStatus::PartiallyFilled)
    }
}

/// Cancel reasons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CancelReason {
    UserRequested,
    /// A market order's remainder after the opposite side was exhausted
    UnfilledMarketRemainder,
}

/// Reject reasons, produced by pre-trade risk checks and input validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RejectReason {
    AccountNotFound,
    AccountInactive,
    InsufficientFunds,
    InsufficientHoldings,
    ExposureLimitExceeded,
    NoReferencePrice,
    InvalidQuantity,
    MissingLimitPrice,
}

/// Complete order structure
///
/// `filled_quantity + remaining_quantity == quantity` at all times, and
/// `filled_quantity` only ever grows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: OrderId,
    pub account_id: AccountId,
    pub symbol: MarketId,
    pub side: Side,
    pub order_type: OrderType,
    /// Present for limit orders, absent for market orders
    pub price: Option<Price>,
    pub quantity: Quantity,
    pub filled_quantity: Quantity,
    pub remaining_quantity: Quantity,
    pub status: OrderStatus,
    pub created_at: i64, // Unix nanos
    pub updated_at: i64, // Unix nanos
    pub version: u64,    // Optimistic concurrency
}

impl Order {
    /// Create a new limit order in the `New` state.
    pub fn new_limit(
        account_id: AccountId,
        symbol: MarketId,
        side: Side,
        price: Price,
        quantity: Quantity,
        timestamp: i64,
    ) -> Self {
        Self::new(account_id, symbol, side, OrderType::Limit, Some(price), quantity, timestamp)
    }

    /// Create a new market order in the `New` state.
    pub fn new_market(
        account_id: AccountId,
        symbol: MarketId,
        side: Side,
        quantity: Quantity,
        timestamp: i64,
    ) -> Self {
        Self::new(account_id, symbol, side, OrderType::Market, None, quantity, timestamp)
    }

    pub fn new(
        account_id: AccountId,
        symbol: MarketId,
        side: Side,
        order_type: OrderType,
        price: Option<Price>,
        quantity: Quantity,
        timestamp: i64,
    ) -> Self {
        Self {
            order_id: OrderId::new(),
            account_id,
            symbol,
            side,
            order_type,
            price,
            quantity,
            filled_quantity: Quantity::zero(),
            remaining_quantity: quantity,
            status: OrderStatus::New,
            created_at: timestamp,
            updated_at: timestamp,
            version: 0,
        }
    }

    /// The limit price, if this order has one.
    pub fn limit_price(&self) -> Option<Price> {
        self.price
    }

    /// Check quantity invariant: filled + remaining = total
    pub fn check_invariant(&self) -> bool {
        self.filled_quantity.as_decimal() + self.remaining_quantity.as_decimal()
            == self.quantity.as_decimal()
    }

    pub fn is_filled(&self) -> bool {
        self.filled_quantity == self.quantity
    }

    pub fn has_fills(&self) -> bool {
        !self.filled_quantity.is_zero()
    }

    /// Apply a fill and recompute status.
    ///
    /// # Panics
    /// Panics if the fill would exceed total quantity — an overfill is a
    /// matching bug, never a recoverable condition.
    pub fn add_fill(&mut self, fill_quantity: Quantity, timestamp: i64) {
        let new_filled = self.filled_quantity + fill_quantity;

        assert!(
            new_filled.as_decimal() <= self.quantity.as_decimal(),
            "fill would exceed order quantity"
        );

        self.filled_quantity = new_filled;
        self.remaining_quantity = self.quantity.saturating_sub(new_filled);

        if self.is_filled() {
            self.status = OrderStatus::Filled;
        } else {
            self.status = OrderStatus::PartiallyFilled;
        }

        self.updated_at = timestamp;
        self.version += 1;

        assert!(self.check_invariant(), "quantity invariant violated after fill");
    }

    /// Cancel the order, keeping any prior fills.
    ///
    /// # Panics
    /// Panics if the order is already in a terminal state.
    pub fn cancel(&mut self, reason: CancelReason, timestamp: i64) {
        assert!(!self.status.is_terminal(), "cannot cancel a terminal order");

        self.status = OrderStatus::Cancelled(reason);
        self.updated_at = timestamp;
        self.version += 1;
    }

    /// Reject the order before it reaches the book.
    pub fn reject(&mut self, reason: RejectReason, timestamp: i64) {
        assert!(
            self.status == OrderStatus::New && !self.has_fills(),
            "only unmatched new orders can be rejected"
        );

        self.status = OrderStatus::Rejected(reason);
        self.updated_at = timestamp;
        self.version += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limit_order(qty: &str) -> Order {
        Order::new_limit(
            AccountId::new(),
            MarketId::new("BTC/USD"),
            Side::Buy,
            Price::from_u64(50_000),
            Quantity::from_str(qty).unwrap(),
            1_708_123_456_789_000_000,
        )
    }

    #[test]
    fn test_side_opposite_and_sign() {
        assert_eq!(Side::Buy.opposite(), Side::Sell);
        assert_eq!(Side::Sell.opposite(), Side::Buy);
        assert_eq!(Side::Buy.sign(), rust_decimal::Decimal::ONE);
        assert_eq!(Side::Sell.sign(), -rust_decimal::Decimal::ONE);
    }

    #[test]
    fn test_new_order_state() {
        let order = limit_order("1.0");
        assert_eq!(order.status, OrderStatus::New);
        assert!(order.status.is_open());
        assert!(!order.has_fills());
        assert!(order.check_invariant());
    }

    #[test]
    fn test_market_order_has_no_price() {
        let order = Order::new_market(
            AccountId::new(),
            MarketId::new("BTC/USD"),
            Side::Sell,
            Quantity::from_str("2.0").unwrap(),
            1_708_123_456_789_000_000,
        );
        assert_eq!(order.limit_price(), None);
        assert_eq!(order.order_type, OrderType::Market);
    }

    #[test]
    fn test_fill_progression() {
        let mut order = limit_order("1.0");

        order.add_fill(Quantity::from_str("0.3").unwrap(), 1);
        assert_eq!(order.status, OrderStatus::PartiallyFilled);
        assert_eq!(order.version, 1);
        assert!(order.check_invariant());

        order.add_fill(Quantity::from_str("0.7").unwrap(), 2);
        assert_eq!(order.status, OrderStatus::Filled);
        assert!(order.status.is_terminal());
        assert!(order.check_invariant());
    }

    #[test]
    #[should_panic(expected = "fill would exceed order quantity")]
    fn test_overfill_panics() {
        let mut order = limit_order("1.0");
        order.add_fill(Quantity::from_str("1.5").unwrap(), 1);
    }

    #[test]
    fn test_cancel_keeps_fills() {
        let mut order = limit_order("1.0");
        order.add_fill(Quantity::from_str("0.4").unwrap(), 1);
        order.cancel(CancelReason::UserRequested, 2);

        assert_eq!(order.status, OrderStatus::Cancelled(CancelReason::UserRequested));
        assert_eq!(order.filled_quantity, Quantity::from_str("0.4").unwrap());
    }

    #[test]
    #[should_panic(expected = "cannot cancel a terminal order")]
    fn test_cancel_terminal_panics() {
        let mut order = limit_order("1.0");
        order.add_fill(Quantity::from_str("1.0").unwrap(), 1);
        order.cancel(CancelReason::UserRequested, 2);
    }

    #[test]
    fn test_reject() {
        let mut order = limit_order("1.0");
        order.reject(RejectReason::InsufficientFunds, 1);
        assert_eq!(order.status, OrderStatus::Rejected(RejectReason::InsufficientFunds));
        assert!(order.status.is_terminal());
    }

    #[test]
    fn test_serde_round_trip() {
        let order = limit_order("2.5");
        let json = serde_json::to_string(&order).unwrap();
        let back: Order = serde_json::from_str(&json).unwrap();
        assert_eq!(order, back);
    }
}
