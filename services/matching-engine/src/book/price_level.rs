//! FIFO queue of resting orders at one price
//!
//! Time priority within a price level is strict arrival order; the front
//! of the queue is always the next order to trade.

use std::collections::VecDeque;
use types::ids::{AccountId, OrderId};
use types::numeric::Quantity;

/// A resting order's book entry: just enough to match against.
#[derive(Debug, Clone, PartialEq)]
pub struct RestingOrder {
    pub order_id: OrderId,
    pub account_id: AccountId,
    pub remaining: Quantity,
}

/// All orders resting at a single price, in FIFO order.
#[derive(Debug, Clone)]
pub struct PriceLevel {
    orders: VecDeque<RestingOrder>,
    total_quantity: Quantity,
}

impl Default for PriceLevel {
    fn default() -> Self {
        Self::new()
    }
}

impl PriceLevel {
    pub fn new() -> Self {
        Self {
            orders: VecDeque::new(),
            total_quantity: Quantity::zero(),
        }
    }

    /// Append an order at the back of the queue (latest arrival).
    pub fn push_back(&mut self, entry: RestingOrder) {
        self.total_quantity = self.total_quantity + entry.remaining;
        self.orders.push_back(entry);
    }

    /// The next order to trade at this price.
    pub fn front(&self) -> Option<&RestingOrder> {
        self.orders.front()
    }

    /// Consume quantity from the front order, removing it when exhausted.
    ///
    /// # Panics
    /// Panics if the level is empty or the quantity exceeds the front
    /// order's remainder — callers size fills against `front()` first.
    pub fn consume_front(&mut self, quantity: Quantity) {
        let front = self
            .orders
            .front_mut()
            .expect("consume_front on empty price level");
        assert!(
            quantity <= front.remaining,
            "consumed quantity exceeds front order remainder"
        );

        front.remaining = front.remaining.saturating_sub(quantity);
        self.total_quantity = self.total_quantity.saturating_sub(quantity);

        if front.remaining.is_zero() {
            self.orders.pop_front();
        }
    }

    /// Remove an order anywhere in the queue (cancellation path).
    ///
    /// Returns the removed order's remainder, or None if absent.
    pub fn remove(&mut self, order_id: &OrderId) -> Option<Quantity> {
        let index = self.orders.iter().position(|e| &e.order_id == order_id)?;
        let entry = self.orders.remove(index)?;
        self.total_quantity = self.total_quantity.saturating_sub(entry.remaining);
        Some(entry.remaining)
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn total_quantity(&self) -> Quantity {
        self.total_quantity
    }

    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    /// Order ids in queue position, front first.
    pub fn order_ids(&self) -> impl Iterator<Item = &OrderId> {
        self.orders.iter().map(|e| &e.order_id)
    }
}
