//! Limitbook Ports
//!
//! Port definitions (traits) for the limitbook matching core.
//! These define the boundaries between matching logic and its collaborators.

mod error;
mod sink;

pub use error::{MatchingError, MatchingResult, ValidationError};
pub use sink::{MatchEventSink, NullSink};
