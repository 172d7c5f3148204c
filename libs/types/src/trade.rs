//! Trade execution types
//!
//! A trade is the ephemeral output of matching one incoming (taker) order
//! against one resting (maker) order, persisted for audit inside the
//! settlement transaction. The price is always the maker's.

use crate::ids::{AccountId, MarketId, OrderId, TradeId};
use crate::numeric::{Price, Quantity};
use crate::order::Side;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub trade_id: TradeId,
    /// Per-symbol monotonic sequence
    pub sequence: u64,
    pub symbol: MarketId,

    pub maker_order_id: OrderId,
    pub taker_order_id: OrderId,
    pub maker_account_id: AccountId,
    pub taker_account_id: AccountId,

    /// Taker perspective: Buy means the taker bought from the maker
    pub side: Side,
    /// Maker's resting price
    pub price: Price,
    pub quantity: Quantity,

    pub executed_at: i64, // Unix nanos
}

impl Trade {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        sequence: u64,
        symbol: MarketId,
        maker_order_id: OrderId,
        taker_order_id: OrderId,
        maker_account_id: AccountId,
        taker_account_id: AccountId,
        side: Side,
        price: Price,
        quantity: Quantity,
        executed_at: i64,
    ) -> Self {
        Self {
            trade_id: TradeId::new(),
            sequence,
            symbol,
            maker_order_id,
            taker_order_id,
            maker_account_id,
            taker_account_id,
            side,
            price,
            quantity,
            executed_at,
        }
    }

    /// Quote-currency value moved by this trade (price × quantity).
    pub fn notional(&self) -> Decimal {
        self.quantity.as_decimal() * self.price.as_decimal()
    }

    /// The account paying quote currency.
    pub fn buyer_account(&self) -> AccountId {
        match self.side {
            Side::Buy => self.taker_account_id,
            Side::Sell => self.maker_account_id,
        }
    }

    /// The account receiving quote currency.
    pub fn seller_account(&self) -> AccountId {
        match self.side {
            Side::Buy => self.maker_account_id,
            Side::Sell => self.taker_account_id,
        }
    }
}
