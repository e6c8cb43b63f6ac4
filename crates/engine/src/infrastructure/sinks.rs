//! Match event sinks
//!
//! All of these run on the matching path, so none of them block: the
//! channel sinks drop an event rather than wait for a slow consumer.

use crossbeam_channel::{Receiver, Sender, TrySendError};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;

use limitbook_core::MatchEvent;
use limitbook_ports::MatchEventSink;

/// Logs every event through `tracing` at debug level
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl MatchEventSink for TracingSink {
    fn send(&self, event: MatchEvent) {
        match event {
            MatchEvent::TradeExecuted(e) => tracing::debug!(
                sequence = e.sequence,
                taker = %e.taker_order_id,
                maker = %e.maker_order_id,
                side = %e.taker_side,
                price = %e.price,
                qty = %e.quantity,
                "Trade executed"
            ),
            MatchEvent::OrderFilled(e) => tracing::debug!(
                order_id = %e.order_id,
                side = %e.side,
                price = %e.price,
                liquidity = ?e.liquidity,
                "Order filled"
            ),
            MatchEvent::OrderPartiallyFilled(e) => tracing::debug!(
                order_id = %e.order_id,
                side = %e.side,
                price = %e.price,
                filled = %e.filled_quantity,
                remaining = %e.remaining_quantity,
                "Order partially filled"
            ),
            MatchEvent::OrderResting(e) => tracing::debug!(
                order_id = %e.order_id,
                side = %e.side,
                price = %e.price,
                qty = %e.quantity,
                filled = %e.filled_quantity,
                "Order resting"
            ),
        }
    }
}

/// Forwards events to a crossbeam channel
#[derive(Debug)]
pub struct ChannelSink {
    sender: Sender<MatchEvent>,
    dropped: AtomicU64,
}

impl ChannelSink {
    pub fn new(sender: Sender<MatchEvent>) -> Self {
        ChannelSink {
            sender,
            dropped: AtomicU64::new(0),
        }
    }

    /// Sink plus the receiving end of a fresh unbounded channel
    pub fn unbounded() -> (Self, Receiver<MatchEvent>) {
        let (sender, receiver) = crossbeam_channel::unbounded();
        (Self::new(sender), receiver)
    }

    /// Sink plus the receiving end of a fresh bounded channel
    pub fn bounded(capacity: usize) -> (Self, Receiver<MatchEvent>) {
        let (sender, receiver) = crossbeam_channel::bounded(capacity);
        (Self::new(sender), receiver)
    }

    /// Events lost because the channel was full
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl MatchEventSink for ChannelSink {
    fn send(&self, event: MatchEvent) {
        match self.sender.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(order_id = %event.order_id(), "Event channel full, dropping event");
            }
            // Nobody listening
            Err(TrySendError::Disconnected(_)) => {}
        }
    }
}

/// Publishes events to any number of async subscribers
#[derive(Debug, Clone)]
pub struct BroadcastSink {
    tx: broadcast::Sender<MatchEvent>,
}

impl BroadcastSink {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        BroadcastSink { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<MatchEvent> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for BroadcastSink {
    fn default() -> Self {
        Self::new(10_000)
    }
}

impl MatchEventSink for BroadcastSink {
    fn send(&self, event: MatchEvent) {
        // Non-blocking send, ignore errors (no subscribers)
        let _ = self.tx.send(event);
    }
}
