//! Orchestration errors
//!
//! Business rejections (risk failures) are not errors; they come back as
//! orders in the `Rejected` state. Errors here are infrastructure faults
//! and caller mistakes.

use accounting::LedgerError;
use persistence::StoreError;
use thiserror::Error;
use types::ids::OrderId;
use types::order::OrderStatus;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum OrderServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("order {order_id} is already terminal: {status:?}")]
    AlreadyTerminal { order_id: OrderId, status: OrderStatus },

    #[error("market order {0} cannot be cancelled")]
    MarketNotCancellable(OrderId),

    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}
