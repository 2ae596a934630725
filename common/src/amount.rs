//! The token amount register.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::str::FromStr;

/// A non-negative token amount.
///
/// Wraps a wide unsigned register so negative balances are unrepresentable
/// and arithmetic is explicit: all mutation paths go through the checked
/// operations, which surface overflow/underflow as `None` instead of
/// panicking or wrapping.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Amount(u128);

impl Amount {
    /// The zero amount.
    pub const ZERO: Amount = Amount(0);

    /// Create a new amount from raw token units.
    pub const fn new(units: u128) -> Self {
        Self(units)
    }

    /// Get the raw token units.
    pub const fn units(&self) -> u128 {
        self.0
    }

    /// Check if the amount is zero.
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checked addition. Returns `None` on overflow.
    pub fn checked_add(self, other: Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Amount)
    }

    /// Checked subtraction. Returns `None` if `other` exceeds `self`.
    pub fn checked_sub(self, other: Amount) -> Option<Amount> {
        self.0.checked_sub(other.0).map(Amount)
    }
}

// Display and FromStr round-trip through the decimal unit count, matching
// the string-valued amounts the ledger's callers exchange.
impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Amount {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

impl From<u128> for Amount {
    fn from(units: u128) -> Self {
        Self(units)
    }
}

impl From<u64> for Amount {
    fn from(units: u64) -> Self {
        Self(units as u128)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Self {
        // Saturating: a sum over balances is bounded by total supply in any
        // consistent ledger, so saturation only shows up on corrupt input,
        // where it still compares unequal to the recorded supply.
        iter.fold(Amount::ZERO, |acc, a| {
            Amount(acc.0.saturating_add(a.0))
        })
    }
}
