//! Reference prices for market-order costing

use std::collections::HashMap;
use std::sync::RwLock;
use types::ids::MarketId;
use types::numeric::Price;

/// Supplies the latest reference price for a symbol. Market buys are
/// costed against it; a missing price rejects the order.
pub trait PriceSource: Send + Sync {
    fn latest_price(&self, symbol: &MarketId) -> Option<Price>;
}

/// Fixed price table, updated out of band.
#[derive(Debug, Default)]
pub struct StaticPrices {
    prices: RwLock<HashMap<MarketId, Price>>,
}

impl StaticPrices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, symbol: MarketId, price: Price) {
        self.prices
            .write()
            .expect("price table lock poisoned")
            .insert(symbol, price);
    }
}

impl PriceSource for StaticPrices {
    fn latest_price(&self, symbol: &MarketId) -> Option<Price> {
        self.prices
            .read()
            .expect("price table lock poisoned")
            .get(symbol)
            .copied()
    }
}
