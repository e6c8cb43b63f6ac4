mod order_id;
mod price;
mod quantity;

use chrono::{DateTime, Utc};

pub use order_id::OrderId;
pub use price::Price;
pub use quantity::Quantity;

/// Timestamp in UTC
///
/// Supplied by the caller; only its ordering matters to the book.
pub type Timestamp = DateTime<Utc>;
