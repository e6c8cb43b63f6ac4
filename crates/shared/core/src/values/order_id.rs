use serde::{Deserialize, Serialize};
use std::fmt;

/// Caller-supplied order identifier
///
/// Opaque to the book: it is never parsed, generated or checked for uniqueness.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OrderId(String);

impl OrderId {
    pub fn new(value: impl Into<String>) -> Self {
        OrderId(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for OrderId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for OrderId {
    fn from(value: &str) -> Self {
        OrderId::new(value)
    }
}

impl From<String> for OrderId {
    fn from(value: String) -> Self {
        OrderId(value)
    }
}
