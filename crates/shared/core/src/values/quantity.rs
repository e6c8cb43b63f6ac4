//! Integer order quantity
//!
//! Stored as i64 so that non-positive input can travel as far as the
//! validation boundary. Anything resting in a book is strictly positive.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Sub};

/// Order quantity in whole units
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Quantity(i64);

impl Quantity {
    pub const ZERO: Quantity = Quantity(0);

    #[inline(always)]
    pub const fn new(units: i64) -> Self {
        Self(units)
    }

    #[inline(always)]
    pub const fn units(self) -> i64 {
        self.0
    }

    #[inline(always)]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    #[inline(always)]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Subtract, flooring at zero
    #[inline(always)]
    pub const fn saturating_sub(self, rhs: Quantity) -> Quantity {
        let diff = self.0.saturating_sub(rhs.0);
        if diff < 0 { Quantity(0) } else { Quantity(diff) }
    }
}

impl From<i64> for Quantity {
    fn from(value: i64) -> Self {
        Quantity(value)
    }
}

impl From<Quantity> for i64 {
    fn from(quantity: Quantity) -> i64 {
        quantity.0
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Saturates at `i64::MAX`; totals over many large orders never wrap
impl Add for Quantity {
    type Output = Quantity;
    fn add(self, rhs: Self) -> Self::Output {
        Quantity(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Quantity {
    type Output = Quantity;
    fn sub(self, rhs: Self) -> Self::Output {
        Quantity(self.0.saturating_sub(rhs.0))
    }
}

impl Sum for Quantity {
    fn sum<I: Iterator<Item = Quantity>>(iter: I) -> Self {
        iter.fold(Quantity::ZERO, |a, b| a + b)
    }
}

impl<'a> Sum<&'a Quantity> for Quantity {
    fn sum<I: Iterator<Item = &'a Quantity>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saturating_sub_floors_at_zero() {
        assert_eq!(Quantity::new(3).saturating_sub(Quantity::new(5)), Quantity::ZERO);
        assert_eq!(Quantity::new(5).saturating_sub(Quantity::new(3)), Quantity::new(2));
    }

    #[test]
    fn test_sum() {
        let total: Quantity = [Quantity::new(1), Quantity::new(2), Quantity::new(3)]
            .iter()
            .sum();
        assert_eq!(total, Quantity::new(6));
    }

    #[test]
    fn test_large_totals_saturate() {
        let total: Quantity = [Quantity::new(i64::MAX), Quantity::new(i64::MAX)]
            .iter()
            .sum();
        assert_eq!(total, Quantity::new(i64::MAX));
        assert_eq!(Quantity::new(i64::MAX) + Quantity::new(1), Quantity::new(i64::MAX));
    }
}
