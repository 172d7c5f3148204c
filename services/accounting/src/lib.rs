//! Ledger postings and position keeping
//!
//! The ledger is the source of truth for balances: every movement is a
//! paired debit and credit, each appended with the balance it produced,
//! so `balance == Σ entries` holds for every account at every commit.
//! The free functions operate on an open transaction so settlement can
//! fold money movement and position updates into one atomic commit.

pub mod ledger;
pub mod positions;

pub use ledger::{LedgerError, LedgerService};
pub use positions::PositionService;
