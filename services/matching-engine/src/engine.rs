//! Single-symbol matching engine
//!
//! The engine owns the two sorted sequences for one symbol and walks the
//! opposite side for each incoming order. It validates nothing about
//! accounts or balances; that is the caller's job. The caller also
//! serializes calls per symbol, so no interior locking happens here.

use serde::Serialize;
use types::ids::{MarketId, OrderId};
use types::numeric::{Price, Quantity};
use types::order::{Order, OrderType, Side};
use types::trade::Trade;

use crate::book::{BookSide, RestingOrder};
use crate::matching::{crossing, MatchExecutor};

pub struct SymbolEngine {
    symbol: MarketId,
    bids: BookSide,
    asks: BookSide,
    executor: MatchExecutor,
}

/// What happened to the incoming order after matching.
#[derive(Debug, Clone, PartialEq)]
pub enum Remainder {
    /// Fully consumed; nothing left over
    None,
    /// The unfilled limit remainder now rests in the book
    Rested,
    /// A market order's leftover after the opposite side was exhausted;
    /// never inserted — the caller gives it an explicit terminal state
    UnfilledMarket(Quantity),
}

/// Result of processing one incoming order.
#[derive(Debug, Clone)]
pub struct MatchOutcome {
    /// One trade per consumed resting order, in execution order
    pub trades: Vec<Trade>,
    pub remainder: Remainder,
}

/// Read-only aggregate depth snapshot, best prices first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookSnapshot {
    pub symbol: MarketId,
    pub bids: Vec<(Price, Quantity)>,
    pub asks: Vec<(Price, Quantity)>,
}

impl SymbolEngine {
    pub fn new(symbol: MarketId) -> Self {
        Self::with_sequence(symbol, 0)
    }

    /// Start trade sequence numbering at `sequence`; used when carrying
    /// the counter across a rebuild.
    pub fn with_sequence(symbol: MarketId, sequence: u64) -> Self {
        Self {
            symbol,
            bids: BookSide::new(Side::Buy),
            asks: BookSide::new(Side::Sell),
            executor: MatchExecutor::new(sequence),
        }
    }

    pub fn symbol(&self) -> &MarketId {
        &self.symbol
    }

    /// Next trade sequence this engine would assign.
    pub fn sequence(&self) -> u64 {
        self.executor.sequence()
    }

    /// Match an incoming order against the book, mutating its fill state.
    ///
    /// Market orders walk the opposite side from the best price outward
    /// until filled or the side is exhausted; limit orders walk only
    /// while crossing and rest their remainder. Every trade executes at
    /// the resting (maker) order's price.
    ///
    /// # Panics
    /// Panics on precondition violations: wrong symbol, zero quantity, a
    /// limit order without a price, or an already-terminal order.
    pub fn process_order(&mut self, order: &mut Order, timestamp: i64) -> MatchOutcome {
        assert_eq!(order.symbol, self.symbol, "order routed to wrong symbol engine");
        assert!(!order.quantity.is_zero(), "order quantity must be positive");
        assert!(order.status.is_open(), "only open orders can be matched");
        if order.order_type == OrderType::Limit {
            assert!(order.price.is_some(), "limit order requires a price");
        }

        let mut trades = Vec::new();

        while !order.is_filled() {
            let opposite = match order.side {
                Side::Buy => &mut self.asks,
                Side::Sell => &mut self.bids,
            };
            let Some((maker_price, maker)) = opposite.peek_best() else {
                break;
            };
            if !crossing::crosses(order.side, order.limit_price(), maker_price) {
                break;
            }

            let match_quantity = order.remaining_quantity.min(maker.remaining);
            let trade = self.executor.build_trade(
                self.symbol.clone(),
                maker.order_id,
                order.order_id,
                maker.account_id,
                order.account_id,
                order.side,
                maker_price,
                match_quantity,
                timestamp,
            );
            trades.push(trade);

            order.add_fill(match_quantity, timestamp);
            match order.side {
                Side::Buy => self.asks.fill_best(match_quantity),
                Side::Sell => self.bids.fill_best(match_quantity),
            }
        }

        let remainder = if order.is_filled() {
            Remainder::None
        } else if order.order_type == OrderType::Market {
            Remainder::UnfilledMarket(order.remaining_quantity)
        } else {
            self.rest(order);
            Remainder::Rested
        };

        MatchOutcome { trades, remainder }
    }

    /// Reinsert a persisted open order during warm-start recovery.
    ///
    /// Callers feed orders in arrival order so FIFO priority within each
    /// price level is reconstructed exactly.
    ///
    /// # Panics
    /// Panics if the order is not an open limit order for this symbol.
    pub fn add_existing_order(&mut self, order: &Order) {
        assert_eq!(order.symbol, self.symbol, "order routed to wrong symbol engine");
        assert!(order.status.is_open(), "only open orders can rest in the book");
        assert_eq!(
            order.order_type,
            OrderType::Limit,
            "market orders never rest in the book"
        );

        self.rest(order);
    }

    /// Remove a resting order (cancellation).
    ///
    /// Returns true if the order was found at that price and removed.
    pub fn remove_order(&mut self, order_id: &OrderId, side: Side, price: Price) -> bool {
        match side {
            Side::Buy => self.bids.remove(order_id, price),
            Side::Sell => self.asks.remove(order_id, price),
        }
    }

    /// Read-only depth snapshot: top `depth` levels per side.
    pub fn book(&self, depth: usize) -> BookSnapshot {
        BookSnapshot {
            symbol: self.symbol.clone(),
            bids: self.bids.depth(depth),
            asks: self.asks.depth(depth),
        }
    }

    /// Drop all resting orders, keeping the trade sequence counter.
    /// Used when the book is rebuilt from durable order state.
    pub fn clear(&mut self) {
        self.bids = BookSide::new(Side::Buy);
        self.asks = BookSide::new(Side::Sell);
    }

    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }

    fn rest(&mut self, order: &Order) {
        let price = order.limit_price().expect("resting order has a limit price");
        let entry = RestingOrder {
            order_id: order.order_id,
            account_id: order.account_id,
            remaining: order.remaining_quantity,
        };
        match order.side {
            Side::Buy => self.bids.insert(price, entry),
            Side::Sell => self.asks.insert(price, entry),
        }
    }
}
