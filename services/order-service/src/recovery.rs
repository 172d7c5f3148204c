//! Warm-start recovery and book rebuilds
//!
//! The book is a cache over durable order state. Both entry points here
//! reconstruct it from the store's open orders, which are iterated in
//! arrival order so FIFO priority within each price level comes back
//! exactly as it was.

use std::collections::HashMap;

use matching_engine::SymbolEngine;
use persistence::{Store, StoreError};
use tracing::{info, warn};
use types::ids::MarketId;
use types::order::{CancelReason, OrderType};

use crate::error::OrderServiceError;
use crate::registry::EngineRegistry;

/// Rebuild one symbol's book in place from durable open orders.
///
/// The caller holds the symbol lock. The trade sequence counter is
/// preserved across the rebuild.
pub fn rebuild_book(store: &Store, engine: &mut SymbolEngine) -> Result<(), StoreError> {
    let open = store.open_orders_for_symbol(engine.symbol())?;
    engine.clear();
    let mut reinserted = 0;
    // An open market order here is a failed submission awaiting retry or
    // recovery; it never rests.
    for order in open.iter().filter(|o| o.order_type == OrderType::Limit) {
        engine.add_existing_order(order);
        reinserted += 1;
    }
    warn!(symbol = %engine.symbol(), orders = reinserted, "book rebuilt from durable orders");
    Ok(())
}

/// Reconstruct every symbol's book after a restart.
///
/// Open limit orders are reinserted at their remaining quantity. An open
/// market order can only be a submission that crashed between creation
/// and settlement; market orders never rest, so it is terminalized as an
/// unfilled remainder instead. Returns the number of reinserted orders.
pub fn recover(
    store: &Store,
    registry: &EngineRegistry,
    timestamp: i64,
) -> Result<usize, OrderServiceError> {
    // Continue each symbol's trade numbering past what already settled.
    let mut next_sequence: HashMap<MarketId, u64> = HashMap::new();
    for trade in store.trades() {
        let next = next_sequence.entry(trade.symbol.clone()).or_insert(0);
        *next = (*next).max(trade.sequence + 1);
    }
    for (symbol, sequence) in &next_sequence {
        registry.engine_starting_at(symbol, *sequence);
    }

    let open = store.open_orders()?;
    let mut reinserted = 0;

    for order in open {
        if order.order_type == OrderType::Market {
            store.transaction(|tx| {
                let mut row = tx.order(&order.order_id)?;
                if row.status.is_open() {
                    row.cancel(CancelReason::UnfilledMarketRemainder, timestamp);
                    tx.put_order(row);
                }
                Ok::<(), OrderServiceError>(())
            })?;
            warn!(order_id = %order.order_id, "stale open market order terminalized");
            continue;
        }

        let engine = registry.engine(&order.symbol);
        let mut guard = engine.lock().expect("symbol engine lock poisoned");
        guard.add_existing_order(&order);
        reinserted += 1;
    }

    info!(orders = reinserted, "warm start complete");
    Ok(reinserted)
}
