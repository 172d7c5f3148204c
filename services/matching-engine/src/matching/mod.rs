//! Matching logic: crossing predicates and trade construction

pub mod crossing;
pub mod executor;

pub use crossing::crosses;
pub use executor::MatchExecutor;
