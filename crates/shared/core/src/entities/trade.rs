use serde::{Deserialize, Serialize};

use super::Side;
use crate::values::{OrderId, Price, Quantity};

/// One match between an incoming (taker) order and a resting (maker) order
///
/// Always priced at the maker's limit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    /// Per-book execution sequence, strictly increasing
    pub sequence: u64,
    pub taker_order_id: OrderId,
    pub maker_order_id: OrderId,
    pub taker_side: Side,
    pub price: Price,
    pub quantity: Quantity,
}

impl Trade {
    pub fn buyer_order_id(&self) -> &OrderId {
        match self.taker_side {
            Side::Buy => &self.taker_order_id,
            Side::Sell => &self.maker_order_id,
        }
    }

    pub fn seller_order_id(&self) -> &OrderId {
        match self.taker_side {
            Side::Buy => &self.maker_order_id,
            Side::Sell => &self.taker_order_id,
        }
    }

    /// Price times quantity
    pub fn notional(&self) -> i128 {
        self.price.ticks() as i128 * self.quantity.units() as i128
    }
}
