//! limitbook matching
//!
//! Price-time priority ladders and the crossing algorithm for a single
//! instrument book. Nothing here synchronizes; the engine crate decides how
//! submissions are serialized.

mod book;
mod crossing;
mod key;
mod ladder;
mod snapshot;
mod validation;

pub use book::{MatchingCore, SubmitReport};
pub use crossing::crosses;
pub use key::PriceTimeKey;
pub use ladder::{Ladder, PriceLevel};
pub use snapshot::BookSnapshot;
pub use validation::{parse_side, validate_order};

pub use limitbook_ports::{MatchEventSink, MatchingError, MatchingResult, NullSink, ValidationError};
