//! Property-based checks on book ordering and matching behavior.

use matching_engine::{Remainder, SymbolEngine};
use proptest::prelude::*;
use types::ids::{AccountId, MarketId};
use types::numeric::{Price, Quantity};
use types::order::{Order, Side};

fn market() -> MarketId {
    MarketId::new("BTC/USD")
}

fn limit(side: Side, price: u64, qty: u64) -> Order {
    Order::new_limit(
        AccountId::new(),
        market(),
        side,
        Price::from_u64(price),
        Quantity::from_u64(qty),
        1,
    )
}

fn assert_sorted(engine: &SymbolEngine) -> Result<(), TestCaseError> {
    let snapshot = engine.book(usize::MAX);
    // Bids descending by price, best first.
    for pair in snapshot.bids.windows(2) {
        prop_assert!(pair[0].0 > pair[1].0, "bids out of order: {:?}", snapshot.bids);
    }
    // Asks ascending by price, best first.
    for pair in snapshot.asks.windows(2) {
        prop_assert!(pair[0].0 < pair[1].0, "asks out of order: {:?}", snapshot.asks);
    }
    Ok(())
}

proptest! {
    /// After every insertion the book stays sorted: bids descending,
    /// asks ascending, regardless of the order stream.
    #[test]
    fn book_stays_sorted(orders in prop::collection::vec(
        (any::<bool>(), 1u64..500, 1u64..100), 1..60
    )) {
        let mut engine = SymbolEngine::new(market());
        for (is_buy, price, qty) in orders {
            let side = if is_buy { Side::Buy } else { Side::Sell };
            let mut order = limit(side, price, qty);
            engine.process_order(&mut order, 1);
            assert_sorted(&engine)?;
        }
    }

    /// A market buy against enough resting asks consumes them in
    /// ascending-price order and leaves the taker fully filled.
    #[test]
    fn market_buy_consumes_ascending(
        asks in prop::collection::vec((1u64..500, 1u64..50), 1..20),
        take_fraction in 1u64..100,
    ) {
        let mut engine = SymbolEngine::new(market());
        let mut total = 0u64;
        for &(price, qty) in &asks {
            let mut ask = limit(Side::Sell, price, qty);
            engine.process_order(&mut ask, 1);
            total += qty;
        }

        let take = (total * take_fraction / 100).max(1);
        let mut buy = Order::new_market(
            AccountId::new(),
            market(),
            Side::Buy,
            Quantity::from_u64(take),
            2,
        );
        let outcome = engine.process_order(&mut buy, 2);

        prop_assert!(buy.is_filled(), "sum of asks covers the take");
        prop_assert_eq!(outcome.remainder, Remainder::None);
        for pair in outcome.trades.windows(2) {
            prop_assert!(pair[0].price <= pair[1].price, "asks consumed out of price order");
        }
        assert_sorted(&engine)?;
    }

    /// Every trade prints at the maker's resting price, never at the
    /// incoming order's limit.
    #[test]
    fn trades_print_at_maker_price(
        maker_price in 100u64..200,
        taker_offset in 0u64..100,
        qty in 1u64..50,
    ) {
        let mut engine = SymbolEngine::new(market());
        let mut ask = limit(Side::Sell, maker_price, qty);
        engine.process_order(&mut ask, 1);

        let mut buy = limit(Side::Buy, maker_price + taker_offset, qty);
        let outcome = engine.process_order(&mut buy, 2);

        prop_assert_eq!(outcome.trades.len(), 1);
        prop_assert_eq!(outcome.trades[0].price, Price::from_u64(maker_price));
    }
}
