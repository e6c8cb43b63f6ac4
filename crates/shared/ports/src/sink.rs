use limitbook_core::MatchEvent;

/// Port for match notifications
///
/// Called synchronously from inside the matching critical section, right
/// after each match and after an order comes to rest. Implementations must
/// not block and must not call back into the book.
pub trait MatchEventSink: Send + Sync {
    fn send(&self, event: MatchEvent);
}

/// Sink that drops every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl MatchEventSink for NullSink {
    fn send(&self, _event: MatchEvent) {}
}

impl<S: MatchEventSink + ?Sized> MatchEventSink for std::sync::Arc<S> {
    fn send(&self, event: MatchEvent) {
        (**self).send(event)
    }
}
