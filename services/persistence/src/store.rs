//! In-memory transactional store
//!
//! One mutex guards the whole state; `transaction` clones the state,
//! applies the closure to the staged copy, and swaps it back only on Ok.
//! Ledger entries and trades are append-only. Orders keep their arrival
//! order so warm-start recovery can rebuild FIFO priority.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use thiserror::Error;

use types::account::Account;
use types::ids::{AccountId, MarketId, OrderId, UserId};
use types::ledger::LedgerEntry;
use types::order::Order;
use types::position::Position;
use types::trade::Trade;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// Storage is down; callers fail fast and retry later
    #[error("storage unavailable")]
    Unavailable,

    #[error("account not found: {0}")]
    AccountNotFound(AccountId),

    #[error("order not found: {0}")]
    OrderNotFound(OrderId),

    #[error("duplicate order id: {0}")]
    DuplicateOrder(OrderId),

    #[error("duplicate account id: {0}")]
    DuplicateAccount(AccountId),
}

#[derive(Debug, Clone, Default)]
struct State {
    accounts: HashMap<AccountId, Account>,
    orders: HashMap<OrderId, Order>,
    /// Order ids in arrival order; drives open-order reconstruction
    arrival: Vec<OrderId>,
    positions: HashMap<(AccountId, MarketId), Position>,
    ledger: Vec<LedgerEntry>,
    trades: Vec<Trade>,
}

/// Staged view handed to a transaction closure. Every mutation lands on
/// the copy; nothing is visible outside until the closure returns Ok.
pub struct Tx<'a> {
    state: &'a mut State,
}

impl Tx<'_> {
    pub fn account(&self, account_id: &AccountId) -> Result<Account, StoreError> {
        self.state
            .accounts
            .get(account_id)
            .cloned()
            .ok_or(StoreError::AccountNotFound(*account_id))
    }

    pub fn put_account(&mut self, account: Account) {
        self.state.accounts.insert(account.account_id, account);
    }

    pub fn order(&self, order_id: &OrderId) -> Result<Order, StoreError> {
        self.state
            .orders
            .get(order_id)
            .cloned()
            .ok_or(StoreError::OrderNotFound(*order_id))
    }

    /// Upsert an order row. Creation goes through `Store::create_order`
    /// so the arrival index stays consistent; this is for updates.
    pub fn put_order(&mut self, order: Order) {
        self.state.orders.insert(order.order_id, order);
    }

    pub fn position(&self, account_id: &AccountId, symbol: &MarketId) -> Option<Position> {
        self.state
            .positions
            .get(&(*account_id, symbol.clone()))
            .cloned()
    }

    /// Atomic upsert, unique on (account, symbol).
    pub fn put_position(&mut self, position: Position) {
        self.state
            .positions
            .insert((position.account_id, position.symbol.clone()), position);
    }

    pub fn append_ledger(&mut self, entry: LedgerEntry) {
        self.state.ledger.push(entry);
    }

    pub fn append_trade(&mut self, trade: Trade) {
        self.state.trades.push(trade);
    }
}

#[derive(Debug, Default)]
pub struct Store {
    state: Mutex<State>,
    unavailable: AtomicBool,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run a closure against a staged copy of the state. Commits only if
    /// the closure returns Ok; any Err leaves the store untouched.
    pub fn transaction<T, E>(&self, f: impl FnOnce(&mut Tx<'_>) -> Result<T, E>) -> Result<T, E>
    where
        E: From<StoreError>,
    {
        self.check_available()?;
        let mut guard = self.state.lock().expect("store mutex poisoned");
        let mut staged = guard.clone();
        let result = f(&mut Tx { state: &mut staged })?;
        *guard = staged;
        Ok(result)
    }

    // ── Accounts ────────────────────────────────────────────────────

    pub fn insert_account(&self, account: Account) -> Result<(), StoreError> {
        self.check_available()?;
        let mut guard = self.state.lock().expect("store mutex poisoned");
        if guard.accounts.contains_key(&account.account_id) {
            return Err(StoreError::DuplicateAccount(account.account_id));
        }
        guard.accounts.insert(account.account_id, account);
        Ok(())
    }

    pub fn account(&self, account_id: &AccountId) -> Result<Account, StoreError> {
        self.check_available()?;
        let guard = self.state.lock().expect("store mutex poisoned");
        guard
            .accounts
            .get(account_id)
            .cloned()
            .ok_or(StoreError::AccountNotFound(*account_id))
    }

    pub fn accounts_by_user(&self, owner: &UserId) -> Result<Vec<Account>, StoreError> {
        self.check_available()?;
        let guard = self.state.lock().expect("store mutex poisoned");
        let mut accounts: Vec<Account> = guard
            .accounts
            .values()
            .filter(|a| &a.owner == owner)
            .cloned()
            .collect();
        accounts.sort_by_key(|a| a.account_id);
        Ok(accounts)
    }

    // ── Orders ──────────────────────────────────────────────────────

    /// Durably create a new order row. Fails on duplicate id; fails fast
    /// when storage is unavailable, before any matching is attempted.
    pub fn create_order(&self, order: Order) -> Result<(), StoreError> {
        self.check_available()?;
        let mut guard = self.state.lock().expect("store mutex poisoned");
        if guard.orders.contains_key(&order.order_id) {
            return Err(StoreError::DuplicateOrder(order.order_id));
        }
        guard.arrival.push(order.order_id);
        guard.orders.insert(order.order_id, order);
        Ok(())
    }

    pub fn order(&self, order_id: &OrderId) -> Result<Order, StoreError> {
        self.check_available()?;
        let guard = self.state.lock().expect("store mutex poisoned");
        guard
            .orders
            .get(order_id)
            .cloned()
            .ok_or(StoreError::OrderNotFound(*order_id))
    }

    pub fn orders_by_account(&self, account_id: &AccountId) -> Result<Vec<Order>, StoreError> {
        self.check_available()?;
        let guard = self.state.lock().expect("store mutex poisoned");
        Ok(guard
            .arrival
            .iter()
            .filter_map(|id| guard.orders.get(id))
            .filter(|o| &o.account_id == account_id)
            .cloned()
            .collect())
    }

    /// Every New or PartiallyFilled order, in arrival order.
    pub fn open_orders(&self) -> Result<Vec<Order>, StoreError> {
        self.check_available()?;
        let guard = self.state.lock().expect("store mutex poisoned");
        Ok(guard
            .arrival
            .iter()
            .filter_map(|id| guard.orders.get(id))
            .filter(|o| o.status.is_open())
            .cloned()
            .collect())
    }

    pub fn open_orders_for_symbol(&self, symbol: &MarketId) -> Result<Vec<Order>, StoreError> {
        Ok(self
            .open_orders()?
            .into_iter()
            .filter(|o| &o.symbol == symbol)
            .collect())
    }

    // ── Positions ───────────────────────────────────────────────────

    pub fn position(&self, account_id: &AccountId, symbol: &MarketId) -> Option<Position> {
        let guard = self.state.lock().expect("store mutex poisoned");
        guard.positions.get(&(*account_id, symbol.clone())).cloned()
    }

    pub fn positions_for_symbol(&self, symbol: &MarketId) -> Vec<Position> {
        let guard = self.state.lock().expect("store mutex poisoned");
        guard
            .positions
            .values()
            .filter(|p| &p.symbol == symbol)
            .cloned()
            .collect()
    }

    /// Every position across all accounts owned by a user.
    pub fn positions_by_user(&self, owner: &UserId) -> Result<Vec<Position>, StoreError> {
        self.check_available()?;
        let guard = self.state.lock().expect("store mutex poisoned");
        let mut positions: Vec<Position> = guard
            .positions
            .values()
            .filter(|p| {
                guard
                    .accounts
                    .get(&p.account_id)
                    .map(|a| &a.owner == owner)
                    .unwrap_or(false)
            })
            .cloned()
            .collect();
        positions.sort_by(|a, b| (a.account_id, &a.symbol).cmp(&(b.account_id, &b.symbol)));
        Ok(positions)
    }

    // ── Ledger & trades ─────────────────────────────────────────────

    pub fn ledger_entries(&self, account_id: &AccountId) -> Vec<LedgerEntry> {
        let guard = self.state.lock().expect("store mutex poisoned");
        guard
            .ledger
            .iter()
            .filter(|e| &e.account_id == account_id)
            .cloned()
            .collect()
    }

    pub fn trades(&self) -> Vec<Trade> {
        let guard = self.state.lock().expect("store mutex poisoned");
        guard.trades.clone()
    }

    // ── Availability ────────────────────────────────────────────────

    /// Simulate the backing store going down; reads, writes, and
    /// transactions fail with `Unavailable` until restored.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable)
        } else {
            Ok(())
        }
    }
}
