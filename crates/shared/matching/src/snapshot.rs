use limitbook_core::{Order, Quantity};
use serde::Serialize;

/// Point-in-time copy of both ladders
///
/// Owned clones in priority order; later activity on the book never shows
/// through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookSnapshot {
    /// Book sequence the copy was taken at
    pub sequence: u64,
    pub bids: Vec<Order>,
    pub asks: Vec<Order>,
}

impl BookSnapshot {
    pub fn buy_orders(&self) -> &[Order] {
        &self.bids
    }

    pub fn sell_orders(&self) -> &[Order] {
        &self.asks
    }

    pub fn total_bid_quantity(&self) -> Quantity {
        self.bids.iter().map(Order::quantity).sum()
    }

    pub fn total_ask_quantity(&self) -> Quantity {
        self.asks.iter().map(Order::quantity).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }
}
