//! Order book infrastructure
//!
//! FIFO price levels keyed by price in a BTreeMap, one `BookSide` per
//! direction.

pub mod price_level;
pub mod side;

pub use price_level::{PriceLevel, RestingOrder};
pub use side::BookSide;
