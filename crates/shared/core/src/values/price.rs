//! Integer limit price
//!
//! Prices are whole ticks. The book never does arithmetic on them beyond
//! comparison and spread, so a plain i64 keeps ordering exact and cheap.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Sub;

/// Limit price in ticks
///
/// Signed so that a malformed (zero or negative) price can be represented
/// and rejected at the submission boundary instead of at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Price(i64);

impl Price {
    pub const ZERO: Price = Price(0);

    #[inline(always)]
    pub const fn new(ticks: i64) -> Self {
        Self(ticks)
    }

    #[inline(always)]
    pub const fn ticks(self) -> i64 {
        self.0
    }

    #[inline(always)]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }
}

impl From<i64> for Price {
    fn from(value: i64) -> Self {
        Price(value)
    }
}

impl From<Price> for i64 {
    fn from(price: Price) -> i64 {
        price.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Sub for Price {
    type Output = Price;
    fn sub(self, rhs: Self) -> Self::Output {
        Price(self.0 - rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_ordering() {
        assert!(Price::new(90) < Price::new(100));
        assert_eq!(Price::new(100) - Price::new(90), Price::new(10));
    }

    #[test]
    fn test_price_positivity() {
        assert!(Price::new(1).is_positive());
        assert!(!Price::ZERO.is_positive());
        assert!(!Price::new(-5).is_positive());
    }
}
