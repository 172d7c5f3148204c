//! Position upserts, keyed by (account, symbol)

use std::sync::Arc;

use persistence::{Store, StoreError, Tx};
use types::ids::{AccountId, MarketId, UserId};
use types::numeric::{Price, Quantity};
use types::order::Side;
use types::position::Position;

/// Apply one fill to the (account, symbol) position on an open
/// transaction, creating a flat position first if none exists.
pub fn apply_fill(
    tx: &mut Tx<'_>,
    account_id: AccountId,
    symbol: &MarketId,
    side: Side,
    quantity: Quantity,
    price: Price,
    timestamp: i64,
) -> Position {
    let mut position = tx
        .position(&account_id, symbol)
        .unwrap_or_else(|| Position::flat(account_id, symbol.clone(), timestamp));
    position.apply_fill(side, quantity, price, timestamp);
    tx.put_position(position.clone());
    position
}

/// Read-side position queries.
#[derive(Clone)]
pub struct PositionService {
    store: Arc<Store>,
}

impl PositionService {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    pub fn position(&self, account_id: &AccountId, symbol: &MarketId) -> Option<Position> {
        self.store.position(account_id, symbol)
    }

    /// Apply one signed delta in its own transaction.
    #[allow(clippy::too_many_arguments)]
    pub fn update_position(
        &self,
        account_id: AccountId,
        symbol: &MarketId,
        side: Side,
        quantity: Quantity,
        price: Price,
        timestamp: i64,
    ) -> Result<Position, StoreError> {
        self.store.transaction(|tx| {
            Ok(apply_fill(tx, account_id, symbol, side, quantity, price, timestamp))
        })
    }

    /// Every position across all accounts the user owns.
    pub fn positions_for_user(&self, owner: &UserId) -> Result<Vec<Position>, StoreError> {
        self.store.positions_by_user(owner)
    }

    pub fn positions_for_symbol(&self, symbol: &MarketId) -> Vec<Position> {
        self.store.positions_for_symbol(symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use types::account::Account;

    fn market() -> MarketId {
        MarketId::new("BTC/USD")
    }

    #[test]
    fn test_apply_fill_creates_then_updates() {
        let store = Arc::new(Store::new());
        let account_id = AccountId::new();

        store
            .transaction::<_, StoreError>(|tx| {
                let position = apply_fill(
                    tx,
                    account_id,
                    &market(),
                    Side::Buy,
                    Quantity::from_str("2.0").unwrap(),
                    Price::from_u64(100),
                    1,
                );
                assert_eq!(position.quantity, Decimal::from(2));
                Ok(())
            })
            .unwrap();

        store
            .transaction::<_, StoreError>(|tx| {
                let position = apply_fill(
                    tx,
                    account_id,
                    &market(),
                    Side::Sell,
                    Quantity::from_str("0.5").unwrap(),
                    Price::from_u64(110),
                    2,
                );
                assert_eq!(position.quantity, Decimal::new(15, 1));
                assert_eq!(position.realized_pnl, Decimal::from(5));
                Ok(())
            })
            .unwrap();

        // One row per (account, symbol), upserted in place.
        let service = PositionService::new(store);
        let stored = service.position(&account_id, &market()).unwrap();
        assert_eq!(stored.quantity, Decimal::new(15, 1));
        assert_eq!(stored.version, 2);
    }

    #[test]
    fn test_positions_for_user_spans_accounts() {
        let store = Arc::new(Store::new());
        let owner = UserId::new();
        let first = Account::new(owner, "USD", 1);
        let second = Account::new(owner, "USD", 1);
        let (first_id, second_id) = (first.account_id, second.account_id);
        store.insert_account(first).unwrap();
        store.insert_account(second).unwrap();

        store
            .transaction::<_, StoreError>(|tx| {
                apply_fill(
                    tx,
                    first_id,
                    &market(),
                    Side::Buy,
                    Quantity::from_u64(1),
                    Price::from_u64(100),
                    1,
                );
                apply_fill(
                    tx,
                    second_id,
                    &MarketId::new("ETH/USD"),
                    Side::Buy,
                    Quantity::from_u64(3),
                    Price::from_u64(10),
                    1,
                );
                Ok(())
            })
            .unwrap();

        let service = PositionService::new(store);
        let positions = service.positions_for_user(&owner).unwrap();
        assert_eq!(positions.len(), 2);
    }
}
