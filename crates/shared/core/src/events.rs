use crate::entities::{Order, Side, Trade};
use crate::values::{OrderId, Price, Quantity};
use serde::{Deserialize, Serialize};

/// Notifications produced by the matching core
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "camelCase")]
pub enum MatchEvent {
    /// Order has no open quantity left and is gone from the book
    OrderFilled(OrderFilledEvent),
    /// Resting order was reduced but keeps its place in the queue
    OrderPartiallyFilled(OrderPartiallyFilledEvent),
    /// Incoming order (or its remainder) was added to its own ladder
    OrderResting(OrderRestingEvent),
    /// A taker matched a maker
    TradeExecuted(TradeExecutedEvent),
}

impl MatchEvent {
    /// The order this event is about (the taker, for trades)
    pub fn order_id(&self) -> &OrderId {
        match self {
            MatchEvent::OrderFilled(e) => &e.order_id,
            MatchEvent::OrderPartiallyFilled(e) => &e.order_id,
            MatchEvent::OrderResting(e) => &e.order_id,
            MatchEvent::TradeExecuted(e) => &e.taker_order_id,
        }
    }
}

/// Which side of a match an order was on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Liquidity {
    Maker,
    Taker,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderFilledEvent {
    pub order_id: OrderId,
    pub side: Side,
    pub price: Price,
    pub liquidity: Liquidity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPartiallyFilledEvent {
    pub order_id: OrderId,
    pub side: Side,
    pub price: Price,
    /// Quantity matched by the triggering submission
    pub filled_quantity: Quantity,
    pub remaining_quantity: Quantity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRestingEvent {
    pub order_id: OrderId,
    pub side: Side,
    pub price: Price,
    /// Open quantity now resting
    pub quantity: Quantity,
    /// Quantity matched on arrival before resting; zero for a pure add
    pub filled_quantity: Quantity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeExecutedEvent {
    pub sequence: u64,
    pub taker_order_id: OrderId,
    pub maker_order_id: OrderId,
    pub taker_side: Side,
    pub price: Price,
    pub quantity: Quantity,
}

impl OrderFilledEvent {
    pub fn new(order: &Order, liquidity: Liquidity) -> Self {
        OrderFilledEvent {
            order_id: order.id.clone(),
            side: order.side,
            price: order.price,
            liquidity,
        }
    }
}

impl OrderRestingEvent {
    pub fn new(order: &Order, filled_quantity: Quantity) -> Self {
        OrderRestingEvent {
            order_id: order.id.clone(),
            side: order.side,
            price: order.price,
            quantity: order.quantity(),
            filled_quantity,
        }
    }

    pub fn is_partially_filled(&self) -> bool {
        self.filled_quantity.is_positive()
    }
}

impl From<&Trade> for TradeExecutedEvent {
    fn from(trade: &Trade) -> Self {
        TradeExecutedEvent {
            sequence: trade.sequence,
            taker_order_id: trade.taker_order_id.clone(),
            maker_order_id: trade.maker_order_id.clone(),
            taker_side: trade.taker_side,
            price: trade.price,
            quantity: trade.quantity,
        }
    }
}
