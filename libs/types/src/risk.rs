//! Pre-trade risk check results
//!
//! A rejection is a normal business result the caller branches on, not an
//! error; only infrastructure faults surface as errors.

use crate::ids::{AccountId, MarketId};
use crate::order::RejectReason;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Outcome of the ordered pre-trade checks; the first failing check wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RiskCheckResult {
    /// Passed all checks
    Pass,
    /// The referenced account does not exist
    AccountNotFound { account_id: AccountId },
    /// The account is suspended or closed
    AccountInactive { account_id: AccountId },
    /// Estimated cost exceeds the free balance
    InsufficientFunds { required: Decimal, available: Decimal },
    /// Sell quantity exceeds the held position (no short-selling)
    InsufficientHoldings { held: Decimal, requested: Decimal },
    /// Projected aggregate net exposure exceeds the house ceiling
    ExposureLimitExceeded { limit: Decimal, projected: Decimal },
    /// No reference price available to cost a market order
    NoReferencePrice { symbol: MarketId },
}

impl RiskCheckResult {
    pub fn is_pass(&self) -> bool {
        matches!(self, RiskCheckResult::Pass)
    }

    /// The terminal reject reason for a failed check, None on pass.
    pub fn reject_reason(&self) -> Option<RejectReason> {
        match self {
            RiskCheckResult::Pass => None,
            RiskCheckResult::AccountNotFound { .. } => Some(RejectReason::AccountNotFound),
            RiskCheckResult::AccountInactive { .. } => Some(RejectReason::AccountInactive),
            RiskCheckResult::InsufficientFunds { .. } => Some(RejectReason::InsufficientFunds),
            RiskCheckResult::InsufficientHoldings { .. } => {
                Some(RejectReason::InsufficientHoldings)
            }
            RiskCheckResult::ExposureLimitExceeded { .. } => {
                Some(RejectReason::ExposureLimitExceeded)
            }
            RiskCheckResult::NoReferencePrice { .. } => Some(RejectReason::NoReferencePrice),
        }
    }
}
