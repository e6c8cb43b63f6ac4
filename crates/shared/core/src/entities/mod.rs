mod order;
mod side;
mod trade;

pub use order::Order;
pub use side::Side;
pub use trade::Trade;
