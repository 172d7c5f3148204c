//! One side of the book: price levels in a BTreeMap
//!
//! Bids and asks share this structure; the side decides which end of the
//! map is "best" (bids: highest price first, asks: lowest price first).
//! BTreeMap iteration keeps snapshots deterministic.

use std::collections::BTreeMap;
use types::ids::OrderId;
use types::numeric::{Price, Quantity};
use types::order::Side;

use super::price_level::{PriceLevel, RestingOrder};

#[derive(Debug, Clone)]
pub struct BookSide {
    side: Side,
    levels: BTreeMap<Price, PriceLevel>,
}

impl BookSide {
    pub fn new(side: Side) -> Self {
        Self {
            side,
            levels: BTreeMap::new(),
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// Insert a resting order at its price, behind earlier arrivals.
    pub fn insert(&mut self, price: Price, entry: RestingOrder) {
        self.levels.entry(price).or_default().push_back(entry);
    }

    /// Remove a resting order; prunes the level if it empties.
    ///
    /// Returns true if the order was found and removed.
    pub fn remove(&mut self, order_id: &OrderId, price: Price) -> bool {
        if let Some(level) = self.levels.get_mut(&price) {
            if level.remove(order_id).is_some() {
                if level.is_empty() {
                    self.levels.remove(&price);
                }
                return true;
            }
        }
        false
    }

    /// The best price on this side, if any.
    pub fn best_price(&self) -> Option<Price> {
        match self.side {
            Side::Buy => self.levels.keys().next_back().copied(),
            Side::Sell => self.levels.keys().next().copied(),
        }
    }

    /// Peek the next order to trade: best price, front of its queue.
    pub fn peek_best(&self) -> Option<(Price, RestingOrder)> {
        let (price, level) = match self.side {
            Side::Buy => self.levels.iter().next_back()?,
            Side::Sell => self.levels.iter().next()?,
        };
        let front = level
            .front()
            .expect("book invariant: empty price level present");
        Some((*price, front.clone()))
    }

    /// Consume quantity from the best level's front order and prune the
    /// level if it empties.
    ///
    /// # Panics
    /// Panics if the side is empty — the caller peeks first.
    pub fn fill_best(&mut self, quantity: Quantity) {
        let price = self
            .best_price()
            .expect("fill_best on empty book side");
        let level = self
            .levels
            .get_mut(&price)
            .expect("book invariant: best price level missing");
        level.consume_front(quantity);
        if level.is_empty() {
            self.levels.remove(&price);
        }
    }

    /// Aggregate depth snapshot: top N levels, best first.
    pub fn depth(&self, depth: usize) -> Vec<(Price, Quantity)> {
        let snapshot = |(price, level): (&Price, &PriceLevel)| (*price, level.total_quantity());
        match self.side {
            Side::Buy => self.levels.iter().rev().take(depth).map(snapshot).collect(),
            Side::Sell => self.levels.iter().take(depth).map(snapshot).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Total resting quantity across all levels.
    pub fn total_quantity(&self) -> Quantity {
        self.levels
            .values()
            .fold(Quantity::zero(), |acc, level| acc + level.total_quantity())
    }
}
