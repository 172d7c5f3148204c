//! Per-symbol engine registry
//!
//! One `SymbolEngine` per market, each behind its own mutex. Holding a
//! symbol's lock makes its holder the single writer for that book;
//! different symbols proceed in parallel.

use std::sync::{Arc, Mutex};

use dashmap::DashMap;
use matching_engine::SymbolEngine;
use types::ids::MarketId;

#[derive(Default)]
pub struct EngineRegistry {
    engines: DashMap<MarketId, Arc<Mutex<SymbolEngine>>>,
}

impl EngineRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The engine for a symbol, created on first use.
    pub fn engine(&self, symbol: &MarketId) -> Arc<Mutex<SymbolEngine>> {
        self.engines
            .entry(symbol.clone())
            .or_insert_with(|| Arc::new(Mutex::new(SymbolEngine::new(symbol.clone()))))
            .clone()
    }

    /// The engine for a symbol, starting trade numbering at `sequence`
    /// if it does not exist yet. Recovery uses this to continue the
    /// per-symbol sequence past already-persisted trades.
    pub fn engine_starting_at(&self, symbol: &MarketId, sequence: u64) -> Arc<Mutex<SymbolEngine>> {
        self.engines
            .entry(symbol.clone())
            .or_insert_with(|| {
                Arc::new(Mutex::new(SymbolEngine::with_sequence(symbol.clone(), sequence)))
            })
            .clone()
    }

    pub fn symbols(&self) -> Vec<MarketId> {
        self.engines.iter().map(|entry| entry.key().clone()).collect()
    }
}
