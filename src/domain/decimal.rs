//! Lossless decimal money type backed by rust_decimal.
//!
//! Prices, ratios and deltas all use this type so that threshold comparisons
//! in scoring are exact.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal as RustDecimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lossless decimal numeric type for prices.
///
/// Serializes to a JSON number (not string).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Decimal(#[serde(with = "rust_decimal::serde::float")] RustDecimal);

impl Decimal {
    pub fn new(value: RustDecimal) -> Self {
        Decimal(value)
    }

    /// Parse a Decimal from a plain (dot-separated) string.
    pub fn from_str_canonical(s: &str) -> Result<Self, rust_decimal::Error> {
        RustDecimal::from_str(s).map(Decimal)
    }

    /// Decimal from a whole number.
    pub fn from_u32(value: u32) -> Self {
        Decimal(RustDecimal::from(value))
    }

    /// Decimal from an `f64`, `None` for NaN and infinities.
    pub fn from_f64(value: f64) -> Option<Self> {
        RustDecimal::from_f64(value).map(|d| Decimal(d.normalize()))
    }

    /// Format without exponent notation or trailing zeros.
    pub fn to_canonical_string(&self) -> String {
        format!("{}", self.0.normalize())
    }

    /// Same value with trailing zeros removed, so `1.50` and `1.5` share a
    /// representation.
    pub fn normalized(&self) -> Self {
        Decimal(self.0.normalize())
    }

    pub fn zero() -> Self {
        Decimal(RustDecimal::ZERO)
    }

    pub fn hundred() -> Self {
        Decimal(RustDecimal::ONE_HUNDRED)
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the value is > 0.
    pub fn is_positive(&self) -> bool {
        !self.is_zero() && self.0.is_sign_positive()
    }

    /// Returns true if the value is < 0.
    pub fn is_negative(&self) -> bool {
        !self.is_zero() && self.0.is_sign_negative()
    }

    pub fn abs(&self) -> Self {
        Decimal(self.0.abs())
    }

    /// Division that yields `None` instead of panicking on a zero divisor.
    pub fn checked_div(&self, rhs: Decimal) -> Option<Decimal> {
        self.0.checked_div(rhs.0).map(Decimal)
    }

    /// `None` when the sum exceeds the representable range.
    pub fn checked_add(&self, rhs: Decimal) -> Option<Decimal> {
        self.0.checked_add(rhs.0).map(Decimal)
    }

    /// `None` when the difference exceeds the representable range.
    pub fn checked_sub(&self, rhs: Decimal) -> Option<Decimal> {
        self.0.checked_sub(rhs.0).map(Decimal)
    }

    /// Largest representable value.
    pub fn max_value() -> Self {
        Decimal(RustDecimal::MAX)
    }

    /// `None` when the product exceeds the representable range.
    pub fn checked_mul(&self, rhs: Decimal) -> Option<Decimal> {
        self.0.checked_mul(rhs.0).map(Decimal)
    }

    /// Whole-number value if it fits in a `u32` and has no fractional part.
    pub fn to_u32_exact(&self) -> Option<u32> {
        if self.0.fract().is_zero() {
            self.0.to_u32()
        } else {
            None
        }
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_canonical_string())
    }
}

impl FromStr for Decimal {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_canonical(s)
    }
}

impl From<RustDecimal> for Decimal {
    fn from(value: RustDecimal) -> Self {
        Decimal(value)
    }
}

impl From<Decimal> for RustDecimal {
    fn from(value: Decimal) -> Self {
        value.0
    }
}

impl From<u32> for Decimal {
    fn from(value: u32) -> Self {
        Decimal::from_u32(value)
    }
}

impl std::ops::Sub for Decimal {
    type Output = Decimal;

    fn sub(self, rhs: Decimal) -> Decimal {
        Decimal(self.0 - rhs.0)
    }
}
