use crossbeam_channel::{Receiver, Sender, bounded};
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, AtomicU64, Ordering};
use std::thread::{self, JoinHandle};
use tokio::sync::oneshot;

use limitbook_core::Order;
use limitbook_matching::{BookSnapshot, MatchingCore, SubmitReport};

use super::command::{DepthResponse, MatchingCommand, ServiceStats};
use crate::error::{EngineError, Result};

/// Configuration for the matching thread
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Name given to the OS thread
    pub thread_name: String,
    /// Channel buffer size for commands
    pub command_buffer_size: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            thread_name: "limitbook-matcher".to_string(),
            command_buffer_size: 10_000,
        }
    }
}

// Service state constants
const STATE_ALIVE: u8 = 0;
const STATE_SHUTTING_DOWN: u8 = 1;
const STATE_DEAD: u8 = 2;
const STATE_FAILED: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceState {
    Alive,
    ShuttingDown,
    Dead,
    /// Stopped after finding the book corrupt
    Failed,
}

impl From<u8> for ServiceState {
    fn from(value: u8) -> Self {
        match value {
            STATE_ALIVE => ServiceState::Alive,
            STATE_SHUTTING_DOWN => ServiceState::ShuttingDown,
            STATE_FAILED => ServiceState::Failed,
            _ => ServiceState::Dead,
        }
    }
}

#[derive(Debug, Default)]
struct Counters {
    orders_processed: AtomicU64,
    orders_rejected: AtomicU64,
    trades_executed: AtomicU64,
}

/// Handle to communicate with the matching thread
///
/// Cheap to clone; every clone feeds the same queue.
#[derive(Clone)]
pub struct MatchingHandle {
    sender: Sender<MatchingCommand>,
    counters: Arc<Counters>,
    state: Arc<AtomicU8>,
}

impl MatchingHandle {
    /// Send a command to the matching thread
    pub fn send(&self, cmd: MatchingCommand) -> Result<()> {
        if self.state() == ServiceState::Failed {
            return Err(EngineError::BookFailed);
        }
        self.sender
            .send(cmd)
            .map_err(|_| EngineError::ServiceStopped)
    }

    /// Submit and block until the order has been matched
    ///
    /// Must not be called from inside an async runtime; use
    /// [`submit_async`](Self::submit_async) there.
    pub fn submit(&self, order: Order) -> Result<Order> {
        self.execute(order).map(|report| report.order)
    }

    pub fn execute(&self, order: Order) -> Result<SubmitReport> {
        let (response, rx) = oneshot::channel();
        self.send(MatchingCommand::Submit { order, response })?;
        rx.blocking_recv().map_err(|_| self.stopped())?
    }

    pub async fn submit_async(&self, order: Order) -> Result<Order> {
        self.execute_async(order).await.map(|report| report.order)
    }

    pub async fn execute_async(&self, order: Order) -> Result<SubmitReport> {
        let (response, rx) = oneshot::channel();
        self.send(MatchingCommand::Submit { order, response })?;
        rx.await.map_err(|_| self.stopped())?
    }

    pub fn snapshot(&self) -> Result<BookSnapshot> {
        let (response, rx) = oneshot::channel();
        self.send(MatchingCommand::Snapshot { response })?;
        rx.blocking_recv().map_err(|_| self.stopped())
    }

    pub async fn snapshot_async(&self) -> Result<BookSnapshot> {
        let (response, rx) = oneshot::channel();
        self.send(MatchingCommand::Snapshot { response })?;
        rx.await.map_err(|_| self.stopped())
    }

    pub fn buy_orders(&self) -> Result<Vec<Order>> {
        self.snapshot().map(|snapshot| snapshot.bids)
    }

    pub fn sell_orders(&self) -> Result<Vec<Order>> {
        self.snapshot().map(|snapshot| snapshot.asks)
    }

    pub async fn depth(&self, levels: usize) -> Result<DepthResponse> {
        let (response, rx) = oneshot::channel();
        self.send(MatchingCommand::GetDepth { levels, response })?;
        rx.await.map_err(|_| self.stopped())
    }

    /// Get service statistics
    pub fn stats(&self) -> ServiceStats {
        ServiceStats {
            orders_processed: self.counters.orders_processed.load(Ordering::Relaxed),
            orders_rejected: self.counters.orders_rejected.load(Ordering::Relaxed),
            trades_executed: self.counters.trades_executed.load(Ordering::Relaxed),
            commands_in_queue: self.sender.len(),
        }
    }

    pub fn state(&self) -> ServiceState {
        ServiceState::from(self.state.load(Ordering::Acquire))
    }

    pub fn is_alive(&self) -> bool {
        self.state() == ServiceState::Alive
    }

    fn stopped(&self) -> EngineError {
        match self.state() {
            ServiceState::Failed => EngineError::BookFailed,
            _ => EngineError::ServiceStopped,
        }
    }
}

/// Book served by a dedicated thread
///
/// The thread owns the [`MatchingCore`] and drains one command queue in
/// arrival order, so submissions from any number of handles are applied
/// strictly one at a time. Dropping the service asks the thread to stop;
/// [`shutdown`](Self::shutdown) also waits for it.
pub struct MatchingService {
    handle: MatchingHandle,
    thread: Option<JoinHandle<()>>,
}

impl MatchingService {
    /// Move `core` onto a new matching thread
    pub fn spawn(core: MatchingCore, config: ServiceConfig) -> Result<Self> {
        let (sender, receiver) = bounded(config.command_buffer_size);
        let counters = Arc::new(Counters::default());
        let state = Arc::new(AtomicU8::new(STATE_ALIVE));

        let handle = MatchingHandle {
            sender,
            counters: Arc::clone(&counters),
            state: Arc::clone(&state),
        };

        let worker = MatchingWorker {
            thread_name: config.thread_name.clone(),
            core,
            receiver,
            counters,
            state,
        };

        let thread = thread::Builder::new()
            .name(config.thread_name)
            .spawn(move || worker.run())
            .map_err(|e| EngineError::Spawn(e.to_string()))?;

        Ok(MatchingService {
            handle,
            thread: Some(thread),
        })
    }

    pub fn handle(&self) -> MatchingHandle {
        self.handle.clone()
    }

    /// Process everything already queued, then stop and join the thread
    pub fn shutdown(mut self) {
        let _ = self.handle.sender.send(MatchingCommand::Shutdown);
        if let Some(thread) = self.thread.take()
            && thread.join().is_err()
        {
            tracing::error!("Matching thread panicked");
        }
        tracing::info!(stats = ?self.handle.stats(), "Matching service shutdown complete");
    }
}

impl std::ops::Deref for MatchingService {
    type Target = MatchingHandle;

    fn deref(&self) -> &MatchingHandle {
        &self.handle
    }
}

impl Drop for MatchingService {
    fn drop(&mut self) {
        // The thread exits on its own once the queue drains
        if self.thread.is_some() {
            let _ = self.handle.sender.send(MatchingCommand::Shutdown);
        }
    }
}

/// Publishes the final state when the worker exits, including by panic
struct StateGuard {
    thread_name: String,
    state: Arc<AtomicU8>,
}

impl Drop for StateGuard {
    fn drop(&mut self) {
        if thread::panicking() {
            tracing::error!(thread = %self.thread_name, "Matching thread panicked");
            self.state.store(STATE_FAILED, Ordering::Release);
        } else if self.state.load(Ordering::Acquire) != STATE_FAILED {
            self.state.store(STATE_DEAD, Ordering::Release);
        }
    }
}

struct MatchingWorker {
    thread_name: String,
    core: MatchingCore,
    receiver: Receiver<MatchingCommand>,
    counters: Arc<Counters>,
    state: Arc<AtomicU8>,
}

impl MatchingWorker {
    /// Main event loop - processes commands sequentially
    fn run(mut self) {
        let _state = StateGuard {
            thread_name: self.thread_name.clone(),
            state: Arc::clone(&self.state),
        };
        tracing::info!(thread = %self.thread_name, "Matching service started");

        loop {
            match self.receiver.recv() {
                Ok(cmd) => {
                    if !self.process_command(cmd) {
                        break;
                    }
                }
                Err(_) => {
                    // Every handle is gone
                    tracing::info!(thread = %self.thread_name, "Command channel closed");
                    self.state.store(STATE_SHUTTING_DOWN, Ordering::Release);
                    break;
                }
            }
        }

        tracing::info!(
            thread = %self.thread_name,
            sequence = self.core.sequence(),
            resting = self.core.order_count(),
            "Matching service stopped"
        );
    }

    /// Process a single command, returns false if the loop should stop
    fn process_command(&mut self, cmd: MatchingCommand) -> bool {
        match cmd {
            MatchingCommand::Submit { order, response } => {
                let result = self.handle_submit(order);
                let fatal = result.as_ref().is_err_and(EngineError::is_fatal);
                if fatal {
                    // Before replying, so the caller already sees FAILED
                    self.state.store(STATE_FAILED, Ordering::Release);
                }
                let _ = response.send(result);
                if fatal {
                    return false;
                }
            }

            MatchingCommand::Snapshot { response } => {
                let _ = response.send(self.core.snapshot());
            }

            MatchingCommand::GetDepth { levels, response } => {
                let _ = response.send(DepthResponse {
                    bids: self.core.bid_depth(levels),
                    asks: self.core.ask_depth(levels),
                    sequence: self.core.sequence(),
                });
            }

            MatchingCommand::Shutdown => {
                self.state.store(STATE_SHUTTING_DOWN, Ordering::Release);
                return false;
            }
        }
        true
    }

    fn handle_submit(&mut self, order: Order) -> Result<SubmitReport> {
        let order_id = order.id.clone();

        match self.core.execute(order) {
            Ok(report) => {
                self.counters.orders_processed.fetch_add(1, Ordering::Relaxed);
                self.counters
                    .trades_executed
                    .fetch_add(report.trades.len() as u64, Ordering::Relaxed);
                Ok(report)
            }
            Err(e) => {
                let err = EngineError::from(e);
                if err.is_fatal() {
                    tracing::error!(
                        order_id = %order_id,
                        error = %err,
                        "Book invariant violated, matching service failing"
                    );
                } else {
                    self.counters.orders_rejected.fetch_add(1, Ordering::Relaxed);
                    tracing::debug!(order_id = %order_id, error = %err, "Order rejected");
                }
                Err(err)
            }
        }
    }
}
