//! Ordered pre-trade checks
//!
//! Check order is fixed: account standing, buyer funds, seller holdings,
//! exposure ceiling. The first failure is returned; later checks do not
//! run. All comparisons are exact decimal arithmetic.

use rust_decimal::Decimal;
use tracing::debug;
use types::account::Account;
use types::numeric::Price;
use types::order::{Order, OrderType, Side};
use types::risk::RiskCheckResult;

use crate::config::RiskConfig;
use crate::exposure::projected_net;

/// Run the full pre-trade check sequence against one order.
///
/// `held` is the placing account's current signed position quantity in
/// the order's symbol, `symbol_net` the aggregate signed net across all
/// accounts, and `market_price` the latest reference price (used only to
/// cost market buys).
pub fn validate_order(
    account: Option<&Account>,
    order: &Order,
    held: Decimal,
    symbol_net: Decimal,
    market_price: Option<Price>,
    config: &RiskConfig,
) -> RiskCheckResult {
    let account = match account {
        Some(account) => account,
        None => {
            return RiskCheckResult::AccountNotFound { account_id: order.account_id };
        }
    };

    if !account.is_active() {
        return RiskCheckResult::AccountInactive { account_id: account.account_id };
    }

    if order.side == Side::Buy {
        let cost_price = match (order.order_type, order.limit_price(), market_price) {
            (OrderType::Limit, Some(limit), _) => limit.as_decimal(),
            (OrderType::Market, _, Some(reference)) => {
                reference.as_decimal() * config.slippage_multiplier()
            }
            (OrderType::Market, _, None) => {
                return RiskCheckResult::NoReferencePrice { symbol: order.symbol.clone() };
            }
            // A limit order without a price is rejected at input validation.
            (OrderType::Limit, None, _) => {
                return RiskCheckResult::NoReferencePrice { symbol: order.symbol.clone() };
            }
        };

        let required = order.quantity.as_decimal() * cost_price;
        let available = account.free_balance();
        if required > available {
            debug!(
                order_id = %order.order_id,
                %required,
                %available,
                "order rejected: insufficient funds"
            );
            return RiskCheckResult::InsufficientFunds { required, available };
        }
    } else {
        // No short-selling: a sell must be covered by current holdings.
        let requested = order.quantity.as_decimal();
        if requested > held {
            debug!(
                order_id = %order.order_id,
                %held,
                %requested,
                "order rejected: insufficient holdings"
            );
            return RiskCheckResult::InsufficientHoldings { held, requested };
        }
    }

    let projected = projected_net(symbol_net, order.side, order.quantity).abs();
    if projected > config.exposure_ceiling {
        debug!(
            order_id = %order.order_id,
            %projected,
            limit = %config.exposure_ceiling,
            "order rejected: exposure ceiling"
        );
        return RiskCheckResult::ExposureLimitExceeded {
            limit: config.exposure_ceiling,
            projected,
        };
    }

    RiskCheckResult::Pass
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::account::AccountStatus;
    use types::ids::{AccountId, MarketId, UserId};
    use types::numeric::Quantity;

    fn market() -> MarketId {
        MarketId::new("BTC/USD")
    }

    fn funded_account(balance: u64) -> Account {
        let mut account = Account::new(UserId::new(), "USD", 1);
        account.apply_posting(Decimal::from(balance), 1);
        account
    }

    fn limit_buy(price: u64, qty: &str) -> Order {
        Order::new_limit(
            AccountId::new(),
            market(),
            Side::Buy,
            Price::from_u64(price),
            Quantity::from_str(qty).unwrap(),
            1,
        )
    }

    #[test]
    fn test_missing_account_rejected() {
        let order = limit_buy(100, "1.0");
        let result = validate_order(
            None,
            &order,
            Decimal::ZERO,
            Decimal::ZERO,
            None,
            &RiskConfig::default(),
        );
        assert_eq!(
            result,
            RiskCheckResult::AccountNotFound { account_id: order.account_id }
        );
    }

    #[test]
    fn test_inactive_account_rejected() {
        let mut account = funded_account(1_000_000);
        account.status = AccountStatus::Suspended;
        let order = limit_buy(100, "1.0");
        let result = validate_order(
            Some(&account),
            &order,
            Decimal::ZERO,
            Decimal::ZERO,
            None,
            &RiskConfig::default(),
        );
        assert_eq!(
            result,
            RiskCheckResult::AccountInactive { account_id: account.account_id }
        );
    }

    #[test]
    fn test_limit_buy_costed_at_limit_price() {
        // 10,000 available, 1 BTC at 50,000 required.
        let account = funded_account(10_000);
        let order = limit_buy(50_000, "1.0");
        let result = validate_order(
            Some(&account),
            &order,
            Decimal::ZERO,
            Decimal::ZERO,
            None,
            &RiskConfig::default(),
        );
        assert_eq!(
            result,
            RiskCheckResult::InsufficientFunds {
                required: Decimal::from(50_000),
                available: Decimal::from(10_000),
            }
        );

        // 0.2 BTC at 50,000 costs exactly 10,000; that passes.
        let order = limit_buy(50_000, "0.2");
        let result = validate_order(
            Some(&account),
            &order,
            Decimal::ZERO,
            Decimal::ZERO,
            None,
            &RiskConfig::default(),
        );
        assert!(result.is_pass());
    }

    #[test]
    fn test_locked_funds_reduce_available() {
        let mut account = funded_account(10_000);
        account.lock(Decimal::from(9_500), 2);
        let order = limit_buy(100, "10");
        let result = validate_order(
            Some(&account),
            &order,
            Decimal::ZERO,
            Decimal::ZERO,
            None,
            &RiskConfig::default(),
        );
        assert_eq!(
            result,
            RiskCheckResult::InsufficientFunds {
                required: Decimal::from(1_000),
                available: Decimal::from(500),
            }
        );
    }

    #[test]
    fn test_market_buy_costed_with_slippage_buffer() {
        // 1 unit at reference 100 costs 105 with the default 5% buffer.
        let account = funded_account(104);
        let order =
            Order::new_market(account.account_id, market(), Side::Buy, Quantity::from_u64(1), 1);
        let result = validate_order(
            Some(&account),
            &order,
            Decimal::ZERO,
            Decimal::ZERO,
            Some(Price::from_u64(100)),
            &RiskConfig::default(),
        );
        assert_eq!(
            result,
            RiskCheckResult::InsufficientFunds {
                required: Decimal::from(105),
                available: Decimal::from(104),
            }
        );
    }

    #[test]
    fn test_market_buy_without_reference_price_rejected() {
        let account = funded_account(1_000_000);
        let order =
            Order::new_market(account.account_id, market(), Side::Buy, Quantity::from_u64(1), 1);
        let result = validate_order(
            Some(&account),
            &order,
            Decimal::ZERO,
            Decimal::ZERO,
            None,
            &RiskConfig::default(),
        );
        assert_eq!(result, RiskCheckResult::NoReferencePrice { symbol: market() });
    }

    #[test]
    fn test_sell_requires_holdings() {
        let account = funded_account(0);
        let order = Order::new_limit(
            account.account_id,
            market(),
            Side::Sell,
            Price::from_u64(100),
            Quantity::from_str("2.0").unwrap(),
            1,
        );
        let result = validate_order(
            Some(&account),
            &order,
            Decimal::from(1),
            Decimal::ZERO,
            None,
            &RiskConfig::default(),
        );
        assert_eq!(
            result,
            RiskCheckResult::InsufficientHoldings {
                held: Decimal::ONE,
                requested: Decimal::from(2),
            }
        );

        // Exactly covered sells pass; no funds needed on the sell side.
        let order = Order::new_limit(
            account.account_id,
            market(),
            Side::Sell,
            Price::from_u64(100),
            Quantity::from_str("1.0").unwrap(),
            1,
        );
        let result = validate_order(
            Some(&account),
            &order,
            Decimal::ONE,
            Decimal::ZERO,
            None,
            &RiskConfig::default(),
        );
        assert!(result.is_pass());
    }

    #[test]
    fn test_exposure_ceiling_on_absolute_net() {
        let account = funded_account(1_000_000_000);
        let config = RiskConfig {
            exposure_ceiling: Decimal::from(100),
            ..RiskConfig::default()
        };

        // Net is already 90 long; buying 20 more projects 110 > 100.
        let order = limit_buy(100, "20");
        let result = validate_order(
            Some(&account),
            &order,
            Decimal::ZERO,
            Decimal::from(90),
            None,
            &config,
        );
        assert_eq!(
            result,
            RiskCheckResult::ExposureLimitExceeded {
                limit: Decimal::from(100),
                projected: Decimal::from(110),
            }
        );

        // A sell shrinking the net toward zero passes the same ceiling.
        let order = Order::new_limit(
            account.account_id,
            market(),
            Side::Sell,
            Price::from_u64(100),
            Quantity::from_u64(20),
            1,
        );
        let result = validate_order(
            Some(&account),
            &order,
            Decimal::from(50),
            Decimal::from(90),
            None,
            &config,
        );
        assert!(result.is_pass());
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// A limit buy passes the funds check iff qty × price fits in
            /// the free balance, for arbitrary whole-number inputs.
            #[test]
            fn limit_buy_funds_boundary(
                balance in 0u64..1_000_000,
                price in 1u64..10_000,
                qty in 1u64..1_000,
            ) {
                let account = funded_account(balance);
                let order = limit_buy(price, &qty.to_string());
                let result = validate_order(
                    Some(&account),
                    &order,
                    Decimal::ZERO,
                    Decimal::ZERO,
                    None,
                    &RiskConfig::default(),
                );

                let required = Decimal::from(price) * Decimal::from(qty);
                if required <= Decimal::from(balance) {
                    prop_assert!(result.is_pass());
                } else {
                    prop_assert_eq!(
                        result,
                        RiskCheckResult::InsufficientFunds {
                            required,
                            available: Decimal::from(balance),
                        }
                    );
                }
            }

            /// Market buys are always costed at reference × 1.05 under the
            /// default configuration.
            #[test]
            fn market_buy_slippage_costing(
                balance in 0u64..1_000_000,
                reference in 1u64..10_000,
                qty in 1u64..1_000,
            ) {
                let account = funded_account(balance);
                let order = Order::new_market(
                    account.account_id,
                    market(),
                    Side::Buy,
                    Quantity::from_u64(qty),
                    1,
                );
                let result = validate_order(
                    Some(&account),
                    &order,
                    Decimal::ZERO,
                    Decimal::ZERO,
                    Some(Price::from_u64(reference)),
                    &RiskConfig::default(),
                );

                let required =
                    Decimal::from(qty) * Decimal::from(reference) * Decimal::new(105, 2);
                prop_assert_eq!(
                    result.is_pass(),
                    required <= Decimal::from(balance)
                );
            }
        }
    }
}
