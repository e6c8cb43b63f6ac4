use limitbook_core::{OrderId, Price, Quantity};
use thiserror::Error;

/// Rejection of a malformed order before it touches the book
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Order {order_id}: quantity must be positive, got {quantity}")]
    NonPositiveQuantity { order_id: OrderId, quantity: Quantity },

    #[error("Order {order_id}: price must be positive, got {price}")]
    NonPositivePrice { order_id: OrderId, price: Price },

    #[error("Invalid side '{0}': must be BUY or SELL")]
    InvalidSide(String),
}

/// Domain-level errors for matching operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatchingError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// A book invariant was found broken mid-match. The book must be
    /// considered corrupt; this is never retried.
    #[error("Book invariant violated: {0}")]
    InvariantViolation(String),
}

impl MatchingError {
    /// True for failures that leave the book unusable
    pub fn is_fatal(&self) -> bool {
        matches!(self, MatchingError::InvariantViolation(_))
    }
}

pub type MatchingResult<T> = std::result::Result<T, MatchingError>;
