//! Transactional storage for orders, accounts, positions, ledger entries,
//! and trades
//!
//! The schema is the contract; the backing implementation is not. This
//! crate provides an in-memory store whose `transaction` gives the
//! all-or-nothing semantics settlement relies on: the closure works on a
//! staged copy, Ok commits atomically, Err discards every write.

pub mod store;

pub use store::{Store, StoreError, Tx};
