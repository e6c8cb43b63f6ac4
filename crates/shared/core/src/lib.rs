//! Limitbook Core Domain
//!
//! Pure domain types for the limitbook matching core.
//! This crate contains no async, no I/O, and is 100% unit testable.

pub mod entities;
pub mod events;
pub mod values;

// Re-export commonly used types at crate root
pub use entities::{Order, Side, Trade};
pub use events::{
    Liquidity, MatchEvent, OrderFilledEvent, OrderPartiallyFilledEvent, OrderRestingEvent,
    TradeExecutedEvent,
};
pub use values::{OrderId, Price, Quantity, Timestamp};
