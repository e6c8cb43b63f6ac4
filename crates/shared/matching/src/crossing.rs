//! Crossing detection logic
//!
//! Decides whether an incoming limit reaches the best resting price on the
//! other side.

use limitbook_core::{Price, Side};

/// Check if an incoming order at `limit` crosses a resting order at `resting`
///
/// A buy crosses any ask at or below its limit, a sell any bid at or above it.
pub fn crosses(incoming_side: Side, limit: Price, resting: Price) -> bool {
    match incoming_side {
        Side::Buy => resting <= limit,
        Side::Sell => resting >= limit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buy_crosses_lower_or_equal_ask() {
        assert!(crosses(Side::Buy, Price::new(100), Price::new(99)));
        assert!(crosses(Side::Buy, Price::new(100), Price::new(100)));
        assert!(!crosses(Side::Buy, Price::new(90), Price::new(100)));
    }

    #[test]
    fn test_sell_crosses_higher_or_equal_bid() {
        assert!(crosses(Side::Sell, Price::new(100), Price::new(101)));
        assert!(crosses(Side::Sell, Price::new(100), Price::new(100)));
        assert!(!crosses(Side::Sell, Price::new(100), Price::new(90)));
    }
}
