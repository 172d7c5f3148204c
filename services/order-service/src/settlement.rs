//! All-or-nothing trade settlement
//!
//! Every trade produced by one submission settles in a single store
//! transaction: maker order updates, the quote-currency transfer, both
//! position deltas, the trade row, and the taker's final state. An error
//! anywhere discards all of it, leaving durable state exactly as it was
//! before matching.

use accounting::ledger::post_transfer;
use accounting::positions::apply_fill;
use matching_engine::{MatchOutcome, Remainder};
use persistence::Store;
use tracing::debug;
use types::ledger::EntryRef;
use types::order::{CancelReason, Order, Side};

use crate::error::OrderServiceError;

/// Persist one submission's full effect atomically.
///
/// `taker` already carries the fills applied during matching; the makers
/// are re-read inside the transaction and updated under the version
/// check `add_fill` enforces. A market remainder is terminalized in the
/// same commit.
pub fn settle(
    store: &Store,
    taker: &mut Order,
    outcome: &MatchOutcome,
    timestamp: i64,
) -> Result<(), OrderServiceError> {
    if let Remainder::UnfilledMarket(_) = outcome.remainder {
        taker.cancel(CancelReason::UnfilledMarketRemainder, timestamp);
    }

    store.transaction(|tx| {
        for trade in &outcome.trades {
            let mut maker = tx.order(&trade.maker_order_id)?;
            maker.add_fill(trade.quantity, timestamp);
            tx.put_order(maker);

            // Buyer pays quote currency to the seller; both legs are the
            // maker-priced notional.
            post_transfer(
                tx,
                trade.buyer_account(),
                trade.notional(),
                trade.seller_account(),
                trade.notional(),
                EntryRef::Trade(trade.trade_id),
                timestamp,
            )?;

            apply_fill(
                tx,
                trade.buyer_account(),
                &trade.symbol,
                Side::Buy,
                trade.quantity,
                trade.price,
                timestamp,
            );
            apply_fill(
                tx,
                trade.seller_account(),
                &trade.symbol,
                Side::Sell,
                trade.quantity,
                trade.price,
                timestamp,
            );

            tx.append_trade(trade.clone());
        }

        tx.put_order(taker.clone());
        Ok::<(), OrderServiceError>(())
    })?;

    debug!(
        order_id = %taker.order_id,
        trades = outcome.trades.len(),
        status = ?taker.status,
        "submission settled"
    );
    Ok(())
}
