//! Background worker that dispatches analysis requests without blocking input.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender, channel};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use docline_core::{AnalysisOutcome, AnalysisRequest, Dispatch};

/// Request sent to the background worker
#[derive(Debug)]
pub enum DispatchRequest {
    /// Send one analysis request to the backend
    Analyze(AnalysisRequest),
    /// Graceful shutdown
    Shutdown,
}

/// Why a request was not accepted
#[derive(Debug)]
pub enum SendError {
    /// Another request is still in flight
    Busy(AnalysisRequest),
    /// The worker thread has stopped
    Disconnected,
}

impl std::fmt::Display for SendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SendError::Busy(_) => write!(f, "An analysis is already running"),
            SendError::Disconnected => write!(f, "Dispatch worker has stopped"),
        }
    }
}

impl std::error::Error for SendError {}

/// Runs the blocking dispatcher on its own thread, one request at a time
pub struct DispatchWorker {
    request_tx: Sender<DispatchRequest>,
    response_rx: Receiver<AnalysisOutcome>,
    in_flight: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl DispatchWorker {
    pub fn new(dispatcher: Box<dyn Dispatch>) -> Self {
        let (request_tx, request_rx) = channel();
        let (response_tx, response_rx) = channel();
        let in_flight = Arc::new(AtomicBool::new(false));

        let ctx = WorkerContext {
            dispatcher,
            response_tx,
            in_flight: in_flight.clone(),
        };

        let thread = thread::spawn(move || {
            ctx.run(request_rx);
        });

        Self {
            request_tx,
            response_rx,
            in_flight,
            thread: Some(thread),
        }
    }

    /// Queue `request` unless one is already in flight.
    pub fn send(&self, request: AnalysisRequest) -> Result<(), SendError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(SendError::Busy(request));
        }

        self.request_tx
            .send(DispatchRequest::Analyze(request))
            .map_err(|_| {
                self.in_flight.store(false, Ordering::SeqCst);
                SendError::Disconnected
            })
    }

    /// Try to receive a completed outcome (non-blocking)
    pub fn try_recv(&self) -> Option<AnalysisOutcome> {
        self.response_rx.try_recv().ok()
    }

    /// Wait up to `timeout` for a completed outcome
    pub fn recv_timeout(&self, timeout: Duration) -> Option<AnalysisOutcome> {
        match self.response_rx.recv_timeout(timeout) {
            Ok(outcome) => Some(outcome),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Whether a request is currently being dispatched
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Shutdown the worker thread
    pub fn shutdown(&self) {
        let _ = self.request_tx.send(DispatchRequest::Shutdown);
    }
}

impl Drop for DispatchWorker {
    /// Joins an idle worker. A worker still inside `dispatch` is detached;
    /// it exits on its own once the call returns.
    fn drop(&mut self) {
        self.shutdown();
        let Some(thread) = self.thread.take() else {
            return;
        };
        if self.is_busy() {
            tracing::warn!("Detaching dispatch worker with a request in flight");
            return;
        }
        let _ = thread.join();
    }
}

/// State owned by the background worker thread.
struct WorkerContext {
    dispatcher: Box<dyn Dispatch>,
    response_tx: Sender<AnalysisOutcome>,
    in_flight: Arc<AtomicBool>,
}

impl WorkerContext {
    fn run(&self, request_rx: Receiver<DispatchRequest>) {
        while let Ok(request) = request_rx.recv() {
            match request {
                DispatchRequest::Shutdown => break,
                DispatchRequest::Analyze(request) => {
                    tracing::debug!(mode = %request.mode(), "Worker picked up request");
                    let outcome = self.dispatcher.dispatch(&request);
                    // Slot is free before the outcome is observable
                    self.in_flight.store(false, Ordering::SeqCst);
                    if self.response_tx.send(outcome).is_err() {
                        break;
                    }
                }
            }
        }
        tracing::debug!("Dispatch worker stopped");
    }
}
