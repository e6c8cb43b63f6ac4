use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use limitbook_core::{Order, Price};
use limitbook_matching::{BookSnapshot, MatchingCore, PriceLevel, SubmitReport};

use crate::error::{EngineError, Result};

/// Book behind one coarse lock
/// Thread-safe, can be cloned and shared across threads
///
/// Every submit and every read holds the lock for its whole duration, so
/// submissions are applied one at a time in lock acquisition order.
#[derive(Clone)]
pub struct SharedMatchingCore {
    core: Arc<Mutex<MatchingCore>>,
    failed: Arc<AtomicBool>,
}

impl SharedMatchingCore {
    pub fn new(core: MatchingCore) -> Self {
        SharedMatchingCore {
            core: Arc::new(Mutex::new(core)),
            failed: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn submit(&self, order: Order) -> Result<Order> {
        self.execute(order).map(|report| report.order)
    }

    pub fn execute(&self, order: Order) -> Result<SubmitReport> {
        let mut core = self.core.lock();
        if self.failed.load(Ordering::Acquire) {
            return Err(EngineError::BookFailed);
        }

        match core.execute(order) {
            Ok(report) => Ok(report),
            Err(e) => {
                let err = EngineError::from(e);
                if err.is_fatal() {
                    tracing::error!(error = %err, "Book failed, refusing further submissions");
                    self.failed.store(true, Ordering::Release);
                }
                Err(err)
            }
        }
    }

    pub fn is_failed(&self) -> bool {
        self.failed.load(Ordering::Acquire)
    }

    pub fn buy_orders(&self) -> Vec<Order> {
        self.core.lock().buy_orders()
    }

    pub fn sell_orders(&self) -> Vec<Order> {
        self.core.lock().sell_orders()
    }

    pub fn snapshot(&self) -> BookSnapshot {
        self.core.lock().snapshot()
    }

    pub fn best_bid(&self) -> Option<Price> {
        self.core.lock().best_bid()
    }

    pub fn best_ask(&self) -> Option<Price> {
        self.core.lock().best_ask()
    }

    pub fn depth(&self, levels: usize) -> (Vec<PriceLevel>, Vec<PriceLevel>) {
        let core = self.core.lock();
        (core.bid_depth(levels), core.ask_depth(levels))
    }

    /// Run `f` with the book locked
    pub fn with_core<R>(&self, f: impl FnOnce(&MatchingCore) -> R) -> R {
        f(&self.core.lock())
    }
}
