use limitbook_core::{Order, Side};
use limitbook_ports::ValidationError;

/// Reject orders the crossing algorithm is not defined for
///
/// Runs before either ladder is touched, so a rejection leaves the book
/// exactly as it was.
pub fn validate_order(order: &Order) -> Result<(), ValidationError> {
    if !order.quantity().is_positive() {
        return Err(ValidationError::NonPositiveQuantity {
            order_id: order.id.clone(),
            quantity: order.quantity(),
        });
    }

    if !order.price.is_positive() {
        return Err(ValidationError::NonPositivePrice {
            order_id: order.id.clone(),
            price: order.price,
        });
    }

    Ok(())
}

/// Parse a side from external input (config files, CLI)
pub fn parse_side(value: &str) -> Result<Side, ValidationError> {
    Side::try_from(value).map_err(|_| ValidationError::InvalidSide(value.to_string()))
}
