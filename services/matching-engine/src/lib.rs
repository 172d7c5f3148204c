//! Per-symbol price-time-priority matching
//!
//! One `SymbolEngine` owns the bid and ask sequences for a single symbol.
//! Matching is a pure in-memory computation: the engine never touches
//! accounts or balances, and the caller serializes access per symbol.
//!
//! **Key invariants:**
//! - Bids sorted descending by price, asks ascending, FIFO within a level
//! - Trades always execute at the resting (maker) order's price
//! - Deterministic: same input sequence, same trades
//! - Non-positive quantities are a precondition violation, not an input

pub mod book;
pub mod engine;
pub mod matching;

pub use engine::{BookSnapshot, MatchOutcome, Remainder, SymbolEngine};
