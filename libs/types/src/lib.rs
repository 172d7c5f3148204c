//! Shared domain types for the spot exchange core
//!
//! Everything money- or quantity-valued is `rust_decimal::Decimal` behind
//! the `Price`/`Quantity` newtypes; all entity identifiers are UUID v7
//! newtypes so chronological ordering falls out of the id itself.
//!
//! # Modules
//! - `ids`: unique identifiers (OrderId, TradeId, AccountId, UserId, MarketId)
//! - `numeric`: exact-decimal Price and Quantity
//! - `order`: order lifecycle types
//! - `trade`: trade execution types
//! - `account`: single-currency account model
//! - `position`: signed per-(account, symbol) positions
//! - `ledger`: append-only double-entry ledger rows
//! - `risk`: pre-trade check results

pub mod account;
pub mod ids;
pub mod ledger;
pub mod numeric;
pub mod order;
pub mod position;
pub mod risk;
pub mod trade;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::account::*;
    pub use crate::ids::*;
    pub use crate::ledger::*;
    pub use crate::numeric::*;
    pub use crate::order::*;
    pub use crate::position::*;
    pub use crate::risk::*;
    pub use crate::trade::*;
}
