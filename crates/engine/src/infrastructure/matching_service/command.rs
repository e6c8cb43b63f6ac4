use limitbook_core::Order;
use limitbook_matching::{BookSnapshot, PriceLevel, SubmitReport};
use tokio::sync::oneshot;

use crate::error::EngineError;

/// Commands that can be sent to the matching thread
#[derive(Debug)]
pub enum MatchingCommand {
    /// Submit an order for matching
    Submit {
        order: Order,
        response: oneshot::Sender<Result<SubmitReport, EngineError>>,
    },

    /// Copy both ladders
    Snapshot {
        response: oneshot::Sender<BookSnapshot>,
    },

    /// Get aggregated book depth
    GetDepth {
        levels: usize,
        response: oneshot::Sender<DepthResponse>,
    },

    /// Stop after everything queued ahead of this
    Shutdown,
}

/// Response from getting depth
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepthResponse {
    pub bids: Vec<PriceLevel>,
    pub asks: Vec<PriceLevel>,
    pub sequence: u64,
}

/// Statistics for the matching service
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceStats {
    pub orders_processed: u64,
    pub orders_rejected: u64,
    pub trades_executed: u64,
    pub commands_in_queue: usize,
}
