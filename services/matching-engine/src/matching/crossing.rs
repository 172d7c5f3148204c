//! Crossing detection
//!
//! A buy crosses while its limit is at or above the best ask; a sell
//! while its limit is at or below the best bid. Market orders (no limit)
//! cross any opposite price.

use types::numeric::Price;
use types::order::Side;

/// Does an incoming order at `taker_limit` cross a resting order at
/// `maker_price`?
pub fn crosses(taker_side: Side, taker_limit: Option<Price>, maker_price: Price) -> bool {
    match (taker_side, taker_limit) {
        (_, None) => true, // market order: walk the book outward from best
        (Side::Buy, Some(limit)) => limit >= maker_price,
        (Side::Sell, Some(limit)) => limit <= maker_price,
    }
}
