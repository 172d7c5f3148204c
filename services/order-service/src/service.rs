//! Order submission, cancellation, and queries
//!
//! The submission path is: durable create, risk checks, match under the
//! symbol lock, settle atomically. The lock is held from the pre-match
//! re-read until settlement commits or the book is rebuilt, so each
//! symbol has exactly one writer at a time.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use accounting::PositionService;
use matching_engine::BookSnapshot;
use persistence::{Store, StoreError};
use risk_engine::{exposure, validate_order, PriceSource, RiskConfig};
use rust_decimal::Decimal;
use tracing::{info, warn};
use types::account::Account;
use types::ids::{AccountId, MarketId, OrderId, UserId};
use types::order::{CancelReason, Order, OrderType, RejectReason};
use types::position::Position;
use types::risk::RiskCheckResult;

use crate::error::OrderServiceError;
use crate::recovery;
use crate::registry::EngineRegistry;
use crate::settlement;

pub struct OrderService {
    store: Arc<Store>,
    registry: EngineRegistry,
    prices: Arc<dyn PriceSource>,
    risk: RiskConfig,
    positions: PositionService,
}

impl OrderService {
    pub fn new(store: Arc<Store>, prices: Arc<dyn PriceSource>, risk: RiskConfig) -> Self {
        Self {
            positions: PositionService::new(store.clone()),
            store,
            registry: EngineRegistry::new(),
            prices,
            risk,
        }
    }

    /// Submit an order and drive it as far as it can go in one call.
    ///
    /// The returned order is the durable post-submission state: rejected,
    /// resting, partially filled, filled, or (for a market remainder)
    /// cancelled. Risk rejections are normal results; an `Err` means an
    /// infrastructure fault, and the order is either absent from the
    /// store or durably open awaiting recovery.
    pub fn place(&self, order: Order) -> Result<Order, OrderServiceError> {
        let timestamp = now_nanos();

        // Durable before matching: if this fails, nothing happened.
        self.store.create_order(order.clone())?;

        if let Some(reason) = input_violation(&order) {
            return self.persist_rejection(&order.order_id, reason, timestamp);
        }

        let risk = self.run_risk_checks(&order)?;
        if let Some(reason) = risk.reject_reason() {
            info!(order_id = %order.order_id, result = ?risk, "submission rejected");
            return self.persist_rejection(&order.order_id, reason, timestamp);
        }

        let engine = self.registry.engine(&order.symbol);
        let mut guard = engine.lock().expect("symbol engine lock poisoned");

        // Re-read under the lock: a cancel may have landed between the
        // durable create and here.
        let mut current = self.store.order(&order.order_id)?;
        if current.status.is_terminal() {
            return Ok(current);
        }

        let outcome = guard.process_order(&mut current, timestamp);
        match settlement::settle(&self.store, &mut current, &outcome, timestamp) {
            Ok(()) => Ok(current),
            Err(err) => {
                // The book absorbed fills that never committed; rebuild it
                // from durable state before releasing the lock.
                warn!(order_id = %order.order_id, error = %err, "settlement failed");
                recovery::rebuild_book(&self.store, &mut guard)?;
                Err(err)
            }
        }
    }

    /// Cancel the open remainder of a limit order.
    ///
    /// Prior fills are untouched; the order moves to
    /// `Cancelled(UserRequested)` and leaves the book in one step.
    pub fn cancel(&self, order_id: &OrderId) -> Result<Order, OrderServiceError> {
        let timestamp = now_nanos();
        let order = self.store.order(order_id)?;

        if order.order_type == OrderType::Market {
            return Err(OrderServiceError::MarketNotCancellable(*order_id));
        }

        let engine = self.registry.engine(&order.symbol);
        let mut guard = engine.lock().expect("symbol engine lock poisoned");

        let current = self.store.order(order_id)?;
        if current.status.is_terminal() {
            return Err(OrderServiceError::AlreadyTerminal {
                order_id: *order_id,
                status: current.status,
            });
        }

        let price = current
            .limit_price()
            .ok_or_else(|| OrderServiceError::MarketNotCancellable(*order_id))?;
        let removed = guard.remove_order(order_id, current.side, price);
        if !removed && current.has_fills() {
            // A partially filled open order must be resting.
            return Err(OrderServiceError::InvariantViolation(format!(
                "open order {order_id} with fills missing from book"
            )));
        }
        // Not removed and no fills: the order is durable but its placer
        // has not reached the book yet; the status write below wins and
        // the placer's re-read drops the submission.

        let result = self.store.transaction(|tx| {
            let mut row = tx.order(order_id)?;
            if row.status.is_terminal() {
                return Err(OrderServiceError::AlreadyTerminal {
                    order_id: *order_id,
                    status: row.status,
                });
            }
            row.cancel(CancelReason::UserRequested, timestamp);
            tx.put_order(row.clone());
            Ok(row)
        });

        match result {
            Ok(row) => {
                info!(order_id = %order_id, "order cancelled");
                Ok(row)
            }
            Err(err) => {
                if removed {
                    // The book dropped the order but the store still has it
                    // open; bring the cache back in line.
                    recovery::rebuild_book(&self.store, &mut guard)?;
                }
                Err(err)
            }
        }
    }

    /// Rebuild every symbol's book from durable open orders.
    pub fn recover(&self) -> Result<usize, OrderServiceError> {
        recovery::recover(&self.store, &self.registry, now_nanos())
    }

    pub fn order(&self, order_id: &OrderId) -> Result<Order, OrderServiceError> {
        Ok(self.store.order(order_id)?)
    }

    pub fn orders_by_account(
        &self,
        account_id: &AccountId,
    ) -> Result<Vec<Order>, OrderServiceError> {
        Ok(self.store.orders_by_account(account_id)?)
    }

    pub fn positions_for_user(&self, owner: &UserId) -> Result<Vec<Position>, OrderServiceError> {
        Ok(self.positions.positions_for_user(owner)?)
    }

    /// Depth snapshot of one symbol's book, best prices first.
    pub fn book(&self, symbol: &MarketId, depth: usize) -> BookSnapshot {
        let engine = self.registry.engine(symbol);
        let guard = engine.lock().expect("symbol engine lock poisoned");
        guard.book(depth)
    }

    fn run_risk_checks(&self, order: &Order) -> Result<RiskCheckResult, OrderServiceError> {
        let account = match self.store.account(&order.account_id) {
            Ok(account) => Some(account),
            Err(StoreError::AccountNotFound(_)) => None,
            Err(err) => return Err(err.into()),
        };
        let held = held_quantity(account.as_ref(), &self.positions, &order.symbol);
        let symbol_net =
            exposure::net_quantity(&self.store.positions_for_symbol(&order.symbol));
        let reference = self.prices.latest_price(&order.symbol);

        Ok(validate_order(
            account.as_ref(),
            order,
            held,
            symbol_net,
            reference,
            &self.risk,
        ))
    }

    fn persist_rejection(
        &self,
        order_id: &OrderId,
        reason: RejectReason,
        timestamp: i64,
    ) -> Result<Order, OrderServiceError> {
        self.store.transaction(|tx| {
            let mut row = tx.order(order_id)?;
            row.reject(reason, timestamp);
            tx.put_order(row.clone());
            Ok(row)
        })
    }
}

fn input_violation(order: &Order) -> Option<RejectReason> {
    if order.quantity.is_zero() {
        return Some(RejectReason::InvalidQuantity);
    }
    if order.order_type == OrderType::Limit && order.price.is_none() {
        return Some(RejectReason::MissingLimitPrice);
    }
    None
}

fn held_quantity(
    account: Option<&Account>,
    positions: &PositionService,
    symbol: &MarketId,
) -> Decimal {
    account
        .and_then(|a| positions.position(&a.account_id, symbol))
        .map(|p| p.quantity)
        .unwrap_or(Decimal::ZERO)
}

fn now_nanos() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before unix epoch")
        .as_nanos() as i64
}
