//! Unique identifier types for exchange entities
//!
//! All IDs use UUID v7 for time-sortable ordering, so chronological
//! queries and warm-start replay can sort on the id alone.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Mint a new id with the current timestamp embedded.
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

uuid_id!(
    /// Unique identifier for an order
    OrderId
);
uuid_id!(
    /// Unique identifier for a trade
    TradeId
);
uuid_id!(
    /// Unique identifier for an account
    AccountId
);
uuid_id!(
    /// Unique identifier for a user; a user may own several accounts
    UserId
);
uuid_id!(
    /// Unique identifier for a ledger entry
    EntryId
);

/// Market identifier (trading pair)
///
/// Format: "BASE/QUOTE" (e.g., "BTC/USD", "ETH/USDC")
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarketId(String);

impl MarketId {
    /// Create a new MarketId from a string.
    ///
    /// # Panics
    /// Panics if the format is invalid (must contain '/')
    pub fn new(symbol: impl Into<String>) -> Self {
        let s = symbol.into();
        assert!(s.contains('/'), "MarketId must be in BASE/QUOTE format");
        Self(s)
    }

    /// Try to create a MarketId, returning None if invalid.
    pub fn try_new(symbol: impl Into<String>) -> Option<Self> {
        let s = symbol.into();
        if s.contains('/') {
            Some(Self(s))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split into base and quote assets.
    pub fn split(&self) -> (&str, &str) {
        let mut parts = self.0.splitn(2, '/');
        let base = parts.next().unwrap_or("");
        let quote = parts.next().unwrap_or("");
        (base, quote)
    }

    /// The quote currency this market settles in.
    pub fn quote(&self) -> &str {
        self.split().1
    }
}

impl fmt::Display for MarketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for MarketId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
