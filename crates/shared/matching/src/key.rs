use limitbook_core::{Order, Price, Side, Timestamp};
use std::cmp::Ordering;

/// Priority key for a resting order
///
/// Price-major, then creation time ascending. For bids a higher price ranks
/// first, for asks a lower one, so the smallest key in a ladder is always its
/// best. Orders with identical price and timestamp share a key; their
/// arrival order is kept by the ladder's per-key queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PriceTimeKey {
    price: Price,
    created_at: Timestamp,
    is_bid: bool,
}

impl PriceTimeKey {
    pub fn bid(price: Price, created_at: Timestamp) -> Self {
        PriceTimeKey {
            price,
            created_at,
            is_bid: true,
        }
    }

    pub fn ask(price: Price, created_at: Timestamp) -> Self {
        PriceTimeKey {
            price,
            created_at,
            is_bid: false,
        }
    }

    pub fn for_order(order: &Order) -> Self {
        match order.side {
            Side::Buy => Self::bid(order.price, order.created_at),
            Side::Sell => Self::ask(order.price, order.created_at),
        }
    }

    pub fn price(&self) -> Price {
        self.price
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn side(&self) -> Side {
        if self.is_bid { Side::Buy } else { Side::Sell }
    }
}

impl Ord for PriceTimeKey {
    fn cmp(&self, other: &Self) -> Ordering {
        let by_price = if self.is_bid {
            // Bids: higher price first
            other.price.cmp(&self.price)
        } else {
            // Asks: lower price first
            self.price.cmp(&other.price)
        };

        by_price
            .then_with(|| self.created_at.cmp(&other.created_at))
            .then_with(|| self.is_bid.cmp(&other.is_bid))
    }
}

impl PartialOrd for PriceTimeKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use limitbook_core::Quantity;

    #[test]
    fn test_bid_keys_rank_higher_price_first() {
        let now = Utc::now();
        let high = PriceTimeKey::bid(Price::new(100), now + Duration::seconds(5));
        let low = PriceTimeKey::bid(Price::new(90), now);
        assert!(high < low);
    }

    #[test]
    fn test_ask_keys_rank_lower_price_first() {
        let now = Utc::now();
        let low = PriceTimeKey::ask(Price::new(90), now + Duration::seconds(5));
        let high = PriceTimeKey::ask(Price::new(100), now);
        assert!(low < high);
    }

    #[test]
    fn test_equal_price_ranks_earlier_first() {
        let now = Utc::now();
        let later = now + Duration::milliseconds(1);
        assert!(PriceTimeKey::bid(Price::new(100), now) < PriceTimeKey::bid(Price::new(100), later));
        assert!(PriceTimeKey::ask(Price::new(100), now) < PriceTimeKey::ask(Price::new(100), later));
    }

    #[test]
    fn test_identical_inputs_compare_equal() {
        let now = Utc::now();
        let a = PriceTimeKey::ask(Price::new(100), now);
        let b = PriceTimeKey::ask(Price::new(100), now);
        assert_eq!(a.cmp(&b), Ordering::Equal);
        assert_eq!(a, b);
    }

    #[test]
    fn test_key_for_order_follows_side() {
        let now = Utc::now();
        let key = PriceTimeKey::for_order(&Order::buy("1", Price::new(100), Quantity::new(5), now));
        assert_eq!(key.side(), Side::Buy);
        assert_eq!(key.price(), Price::new(100));
        assert_eq!(key.created_at(), now);
    }
}
