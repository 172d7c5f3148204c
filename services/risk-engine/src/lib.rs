//! Pre-trade risk validation
//!
//! Stateless, synchronous checks run before an order touches the book:
//! account standing, buyer funds, seller holdings, and the house-wide
//! exposure ceiling. The first failing check wins and its result carries
//! the numbers that failed it.

pub mod config;
pub mod exposure;
pub mod price_source;
pub mod validator;

pub use config::RiskConfig;
pub use price_source::{PriceSource, StaticPrices};
pub use validator::validate_order;
