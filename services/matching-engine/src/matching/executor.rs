//! Trade construction with per-engine sequence numbering

use types::ids::{AccountId, MarketId, OrderId};
use types::numeric::{Price, Quantity};
use types::order::Side;
use types::trade::Trade;

/// Builds trades and hands out a monotonic sequence per symbol engine.
#[derive(Debug, Clone)]
pub struct MatchExecutor {
    sequence_counter: u64,
}

impl MatchExecutor {
    pub fn new(starting_sequence: u64) -> Self {
        Self {
            sequence_counter: starting_sequence,
        }
    }

    /// The next sequence a trade would be assigned; used to carry the
    /// counter across a book rebuild.
    pub fn sequence(&self) -> u64 {
        self.sequence_counter
    }

    fn next_sequence(&mut self) -> u64 {
        let seq = self.sequence_counter;
        self.sequence_counter += 1;
        seq
    }

    /// Build one trade. The price is the maker's resting price; the side
    /// is the taker's.
    #[allow(clippy::too_many_arguments)]
    pub fn build_trade(
        &mut self,
        symbol: MarketId,
        maker_order_id: OrderId,
        taker_order_id: OrderId,
        maker_account_id: AccountId,
        taker_account_id: AccountId,
        taker_side: Side,
        maker_price: Price,
        quantity: Quantity,
        timestamp: i64,
    ) -> Trade {
        Trade::new(
            self.next_sequence(),
            symbol,
            maker_order_id,
            taker_order_id,
            maker_account_id,
            taker_account_id,
            taker_side,
            maker_price,
            quantity,
            timestamp,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_monotonic() {
        let mut executor = MatchExecutor::new(1000);

        let first = executor.build_trade(
            MarketId::new("BTC/USD"),
            OrderId::new(),
            OrderId::new(),
            AccountId::new(),
            AccountId::new(),
            Side::Buy,
            Price::from_u64(50_000),
            Quantity::from_str("0.5").unwrap(),
            1,
        );
        let second = executor.build_trade(
            MarketId::new("BTC/USD"),
            OrderId::new(),
            OrderId::new(),
            AccountId::new(),
            AccountId::new(),
            Side::Sell,
            Price::from_u64(50_000),
            Quantity::from_str("0.3").unwrap(),
            2,
        );

        assert_eq!(first.sequence, 1000);
        assert_eq!(second.sequence, 1001);
        assert_eq!(executor.sequence(), 1002);
    }

    #[test]
    fn test_trade_carries_maker_price() {
        let mut executor = MatchExecutor::new(0);
        let trade = executor.build_trade(
            MarketId::new("ETH/USDC"),
            OrderId::new(),
            OrderId::new(),
            AccountId::new(),
            AccountId::new(),
            Side::Buy,
            Price::from_str("3000.50").unwrap(),
            Quantity::from_str("2.0").unwrap(),
            1,
        );

        assert_eq!(trade.price, Price::from_str("3000.50").unwrap());
        assert_eq!(trade.side, Side::Buy);
    }
}
