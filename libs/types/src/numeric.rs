//! Exact-decimal Price and Quantity newtypes
//!
//! All monetary and quantity arithmetic runs on `rust_decimal::Decimal`;
//! binary floating point never appears in risk checks, ledger math, or
//! position math. Values are normalized at construction so `1.50` and
//! `1.5` compare and hash identically (they key `BTreeMap` price levels).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;
use thiserror::Error;

/// Construction errors for the numeric newtypes
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NumericError {
    #[error("price must be strictly positive, got {0}")]
    NonPositivePrice(Decimal),

    #[error("quantity must be non-negative, got {0}")]
    NegativeQuantity(Decimal),

    #[error("invalid decimal literal: {0}")]
    Parse(String),
}

/// A strictly positive execution or limit price.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Create a price, rejecting zero and negative values.
    pub fn try_new(value: Decimal) -> Result<Self, NumericError> {
        if value <= Decimal::ZERO {
            return Err(NumericError::NonPositivePrice(value));
        }
        Ok(Self(value.normalize()))
    }

    /// Create a price from a whole number. Panics on zero.
    pub fn from_u64(value: u64) -> Self {
        Self::try_new(Decimal::from(value)).expect("from_u64 requires a positive value")
    }

    /// Parse an exact decimal literal (no float round-trip).
    pub fn from_str(s: &str) -> Result<Self, NumericError> {
        let value =
            Decimal::from_str_exact(s).map_err(|e| NumericError::Parse(e.to_string()))?;
        Self::try_new(value)
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A non-negative order or trade quantity.
///
/// Zero is representable (an exhausted remainder) but order entry points
/// treat zero as a precondition violation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Quantity(Decimal);

impl Quantity {
    /// Create a quantity, rejecting negative values.
    pub fn try_new(value: Decimal) -> Result<Self, NumericError> {
        if value < Decimal::ZERO {
            return Err(NumericError::NegativeQuantity(value));
        }
        Ok(Self(value.normalize()))
    }

    /// Create a quantity from a whole number.
    pub fn from_u64(value: u64) -> Self {
        Self(Decimal::from(value))
    }

    /// Parse an exact decimal literal.
    pub fn from_str(s: &str) -> Result<Self, NumericError> {
        let value =
            Decimal::from_str_exact(s).map_err(|e| NumericError::Parse(e.to_string()))?;
        Self::try_new(value)
    }

    pub fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// Subtraction clamped at zero; quantities never go negative.
    pub fn saturating_sub(&self, other: Quantity) -> Quantity {
        if other.0 >= self.0 {
            Quantity::zero()
        } else {
            Quantity((self.0 - other.0).normalize())
        }
    }

    pub fn min(&self, other: Quantity) -> Quantity {
        if self.0 <= other.0 {
            *self
        } else {
            other
        }
    }
}

impl Add for Quantity {
    type Output = Quantity;

    fn add(self, rhs: Quantity) -> Quantity {
        Quantity((self.0 + rhs.0).normalize())
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
