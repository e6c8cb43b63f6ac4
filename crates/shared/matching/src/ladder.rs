use std::collections::{BTreeMap, VecDeque};

use limitbook_core::{Order, Price, Quantity, Side};
use serde::{Deserialize, Serialize};

use crate::key::PriceTimeKey;

/// Aggregated view of one price on a ladder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceLevel {
    pub price: Price,
    pub quantity: Quantity,
    pub order_count: usize,
}

/// One side of the book
///
/// Resting orders keyed by price-time priority. Orders that share a key
/// (same price and same timestamp) queue behind each other in arrival order.
/// A key is present only while its queue is non-empty.
#[derive(Debug, Clone)]
pub struct Ladder {
    side: Side,
    levels: BTreeMap<PriceTimeKey, VecDeque<Order>>,
    order_count: usize,
}

impl Ladder {
    pub fn new(side: Side) -> Self {
        Ladder {
            side,
            levels: BTreeMap::new(),
            order_count: 0,
        }
    }

    pub fn bids() -> Self {
        Self::new(Side::Buy)
    }

    pub fn asks() -> Self {
        Self::new(Side::Sell)
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// Key of the highest-priority resting order
    pub fn best_key(&self) -> Option<PriceTimeKey> {
        self.levels.first_key_value().map(|(k, _)| *k)
    }

    pub fn best_price(&self) -> Option<Price> {
        self.best_key().map(|k| k.price())
    }

    /// All resting orders, best first
    pub fn iter(&self) -> impl Iterator<Item = &Order> + '_ {
        self.levels.values().flat_map(|queue| queue.iter())
    }

    /// Append an order behind everything already resting at its key
    pub(crate) fn insert(&mut self, order: Order) {
        debug_assert_eq!(order.side, self.side, "order {} on the wrong ladder", order.id);
        let key = self.key_for(&order);
        self.levels.entry(key).or_default().push_back(order);
        self.order_count += 1;
    }

    /// Oldest order at `key`
    pub(crate) fn head_mut(&mut self, key: &PriceTimeKey) -> Option<&mut Order> {
        self.levels.get_mut(key).and_then(|queue| queue.front_mut())
    }

    /// Pop the head at `key` if it has no open quantity left
    ///
    /// Drops the key once its queue is empty. Returns the removed order.
    pub fn remove_if_exhausted(&mut self, key: &PriceTimeKey) -> Option<Order> {
        let queue = self.levels.get_mut(key)?;
        if !queue.front().is_some_and(Order::is_filled) {
            return None;
        }

        let removed = queue.pop_front();
        if queue.is_empty() {
            self.levels.remove(key);
        }
        if removed.is_some() {
            self.order_count -= 1;
        }
        removed
    }

    /// Number of resting orders
    pub fn len(&self) -> usize {
        self.order_count
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn total_quantity(&self) -> Quantity {
        self.iter().map(Order::quantity).sum()
    }

    /// Top `levels` prices, best first, with quantity and order count summed
    /// across every key at that price
    pub fn depth(&self, levels: usize) -> Vec<PriceLevel> {
        let mut out: Vec<PriceLevel> = Vec::with_capacity(levels.min(self.levels.len()));

        for (key, queue) in &self.levels {
            let quantity: Quantity = queue.iter().map(Order::quantity).sum();
            match out.last_mut() {
                Some(level) if level.price == key.price() => {
                    level.quantity = level.quantity + quantity;
                    level.order_count += queue.len();
                }
                _ => {
                    if out.len() == levels {
                        break;
                    }
                    out.push(PriceLevel {
                        price: key.price(),
                        quantity,
                        order_count: queue.len(),
                    });
                }
            }
        }

        out
    }

    fn key_for(&self, order: &Order) -> PriceTimeKey {
        match self.side {
            Side::Buy => PriceTimeKey::bid(order.price, order.created_at),
            Side::Sell => PriceTimeKey::ask(order.price, order.created_at),
        }
    }
}
