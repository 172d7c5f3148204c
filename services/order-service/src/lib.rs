//! Order lifecycle orchestration
//!
//! This crate owns the path an order takes from submission to terminal
//! state: durable creation, pre-trade risk checks, matching under the
//! per-symbol writer lock, and all-or-nothing settlement of the
//! resulting trades. The order book is treated as a rebuildable cache
//! over durable order state, never as a source of truth.

pub mod error;
pub mod recovery;
pub mod registry;
pub mod service;
pub mod settlement;

pub use error::OrderServiceError;
pub use registry::EngineRegistry;
pub use service::OrderService;
