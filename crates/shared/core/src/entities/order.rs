use serde::{Deserialize, Serialize};

use super::Side;
use crate::values::{OrderId, Price, Quantity, Timestamp};

/// A limit order
///
/// Everything except the open quantity is fixed at construction. The open
/// quantity only ever decreases, through [`Order::fill`], and once the order
/// rests in a ladder only the ladder's owner calls it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub side: Side,
    pub price: Price,
    quantity: Quantity,
    pub created_at: Timestamp,
}

impl Order {
    pub fn new(
        id: impl Into<OrderId>,
        side: Side,
        price: Price,
        quantity: Quantity,
        created_at: Timestamp,
    ) -> Self {
        Order {
            id: id.into(),
            side,
            price,
            quantity,
            created_at,
        }
    }

    pub fn buy(
        id: impl Into<OrderId>,
        price: Price,
        quantity: Quantity,
        created_at: Timestamp,
    ) -> Self {
        Self::new(id, Side::Buy, price, quantity, created_at)
    }

    pub fn sell(
        id: impl Into<OrderId>,
        price: Price,
        quantity: Quantity,
        created_at: Timestamp,
    ) -> Self {
        Self::new(id, Side::Sell, price, quantity, created_at)
    }

    /// Open (unmatched) quantity
    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    pub fn is_filled(&self) -> bool {
        !self.quantity.is_positive()
    }

    /// Reduce the open quantity by a matched amount, flooring at zero
    pub fn fill(&mut self, quantity: Quantity) {
        self.quantity = self.quantity.saturating_sub(quantity);
    }
}
