//! # Request Executor
//!
//! A single background worker that runs board requests one at a time.
//!
//! Submitting a request first cancels the previous one, so at most one
//! request is considered active. Cancellation is cooperative: the running
//! task only notices it at its checkpoints, and a task already past its
//! last checkpoint still completes.

use super::error::RequestError;
use anyhow::{Context, Result};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

type Job = Box<dyn FnOnce() + Send + 'static>;

const WORKER_THREAD_NAME: &str = "simplechat-requests";

/// How long dropping the executor waits for the running request
const SHUTDOWN_GRACE: Duration = Duration::from_millis(200);

#[derive(Debug, Default)]
struct Completion {
    finished: Mutex<bool>,
    signal: Condvar,
}

/// Handle to a submitted request
#[derive(Debug, Clone)]
pub struct RequestHandle {
    sequence: u64,
    token: CancellationToken,
    completion: Arc<Completion>,
}

impl RequestHandle {
    fn new(sequence: u64) -> Self {
        Self {
            sequence,
            token: CancellationToken::new(),
            completion: Arc::new(Completion::default()),
        }
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Ask the task to stop at its next checkpoint
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn is_finished(&self) -> bool {
        *self
            .completion
            .finished
            .lock()
            .unwrap_or_else(|e| e.into_inner())
    }

    /// Block until the task has run (or was dropped); false on timeout
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let guard = self
            .completion
            .finished
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        let (guard, _) = self
            .completion
            .signal
            .wait_timeout_while(guard, timeout, |finished| !*finished)
            .unwrap_or_else(|e| e.into_inner());
        *guard
    }

    fn mark_finished(&self) {
        let mut finished = self
            .completion
            .finished
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        *finished = true;
        self.completion.signal.notify_all();
    }
}

/// Marks the handle finished even if the task panics
struct FinishGuard(RequestHandle);

impl Drop for FinishGuard {
    fn drop(&mut self) {
        self.0.mark_finished();
    }
}

/// What a running task sees of its own submission
#[derive(Debug, Clone)]
pub struct RequestContext {
    sequence: u64,
    token: CancellationToken,
    latest: Arc<AtomicU64>,
}

impl RequestContext {
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Cancellation checkpoint
    pub fn checkpoint(&self) -> Result<(), RequestError> {
        if self.token.is_cancelled() {
            return Err(RequestError::Cancelled);
        }
        Ok(())
    }

    /// False once a newer request has been submitted
    pub fn is_latest(&self) -> bool {
        self.latest.load(Ordering::SeqCst) == self.sequence
    }
}

/// Single-worker executor with cancel-before-submit policy
pub struct RequestExecutor {
    sender: Option<mpsc::Sender<Job>>,
    worker: Option<JoinHandle<()>>,
    pending: Mutex<Option<RequestHandle>>,
    latest: Arc<AtomicU64>,
}

impl RequestExecutor {
    pub fn new() -> Result<Self> {
        let (sender, receiver) = mpsc::channel::<Job>();

        let worker = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || {
                tracing::debug!("Request worker started");
                while let Ok(job) = receiver.recv() {
                    job();
                }
                tracing::debug!("Request worker stopped");
            })
            .context("Failed to spawn request worker thread")?;

        Ok(Self {
            sender: Some(sender),
            worker: Some(worker),
            pending: Mutex::new(None),
            latest: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Cancel the previous request, then queue `task` on the worker
    pub fn submit<F>(&self, task: F) -> RequestHandle
    where
        F: FnOnce(&RequestContext) + Send + 'static,
    {
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());

        if let Some(previous) = pending.take() {
            if !previous.is_finished() {
                tracing::debug!("Cancelling request #{}", previous.sequence());
            }
            previous.cancel();
        }

        let sequence = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        let handle = RequestHandle::new(sequence);
        let context = RequestContext {
            sequence,
            token: handle.token.clone(),
            latest: Arc::clone(&self.latest),
        };

        let guard = FinishGuard(handle.clone());
        let job: Job = Box::new(move || {
            let _guard = guard;
            task(&context);
        });

        let queued = match &self.sender {
            Some(sender) => sender.send(job).is_ok(),
            None => false,
        };
        if queued {
            tracing::debug!("Queued request #{}", sequence);
        } else {
            // The rejected job (and its guard) was dropped, so the handle is finished
            tracing::error!("Request worker is gone; request #{} dropped", sequence);
        }

        *pending = Some(handle.clone());
        handle
    }

    /// The most recently submitted request, if any
    pub fn pending(&self) -> Option<RequestHandle> {
        self.pending
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// True while the most recent request has not finished
    pub fn is_busy(&self) -> bool {
        self.pending().is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for RequestExecutor {
    fn drop(&mut self) {
        // Closing the queue lets the worker loop end
        self.sender.take();

        let Some(worker) = self.worker.take() else {
            return;
        };
        if worker.thread().id() == thread::current().id() {
            return;
        }

        // A blocking send cannot observe the token; leave such a worker behind
        if let Some(handle) = self.pending() {
            handle.cancel();
            if !handle.wait_timeout(SHUTDOWN_GRACE) {
                tracing::debug!(
                    "Request #{} still running; detaching the worker",
                    handle.sequence()
                );
                return;
            }
        }

        if worker.join().is_err() {
            tracing::error!("Request worker panicked");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::channel;

    const WAIT: Duration = Duration::from_secs(5);

    #[test]
    fn executor_should_run_tasks_on_one_worker_thread() {
        let executor = RequestExecutor::new().unwrap();
        let (tx, rx) = channel();

        for _ in 0..3 {
            let tx = tx.clone();
            let handle = executor.submit(move |_| {
                let name = thread::current().name().map(str::to_string);
                tx.send(name).unwrap();
            });
            assert!(handle.wait_timeout(WAIT));
        }

        for _ in 0..3 {
            assert_eq!(
                rx.recv_timeout(WAIT).unwrap().as_deref(),
                Some(WORKER_THREAD_NAME)
            );
        }
    }

    #[test]
    fn submit_should_cancel_the_previous_request_first() {
        let executor = RequestExecutor::new().unwrap();
        let (release_tx, release_rx) = channel::<()>();
        let (seen_tx, seen_rx) = channel();

        let first = executor.submit(move |ctx| {
            release_rx.recv_timeout(WAIT).ok();
            seen_tx.send(ctx.checkpoint().is_err()).unwrap();
        });
        assert!(!first.is_cancelled());

        let second = executor.submit(|_| {});
        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());

        release_tx.send(()).unwrap();
        // The first task observed the cancellation at its checkpoint
        assert!(seen_rx.recv_timeout(WAIT).unwrap());
        assert!(second.wait_timeout(WAIT));
    }

    #[test]
    fn context_should_know_when_it_is_superseded() {
        let executor = RequestExecutor::new().unwrap();
        let (release_tx, release_rx) = channel::<()>();
        let (latest_tx, latest_rx) = channel();

        executor.submit(move |ctx| {
            release_rx.recv_timeout(WAIT).ok();
            latest_tx.send(ctx.is_latest()).unwrap();
        });
        let second = executor.submit(|ctx| assert!(ctx.is_latest()));

        release_tx.send(()).unwrap();
        assert!(!latest_rx.recv_timeout(WAIT).unwrap());
        assert!(second.wait_timeout(WAIT));
    }

    #[test]
    fn sequence_numbers_should_increase() {
        let executor = RequestExecutor::new().unwrap();
        let a = executor.submit(|_| {});
        let b = executor.submit(|_| {});
        assert!(b.sequence() > a.sequence());
        assert_eq!(executor.pending().map(|h| h.sequence()), Some(b.sequence()));
    }

    #[test]
    fn is_busy_should_clear_after_completion() {
        let executor = RequestExecutor::new().unwrap();
        assert!(!executor.is_busy());

        let handle = executor.submit(|_| {});
        assert!(handle.wait_timeout(WAIT));
        assert!(!executor.is_busy());
    }

    #[test]
    fn drop_should_not_wait_for_a_task_stuck_in_blocking_io() {
        let executor = RequestExecutor::new().unwrap();
        let (release_tx, release_rx) = channel::<()>();
        let (started_tx, started_rx) = channel();

        // Ignores its token, like a send blocked inside the HTTP client
        executor.submit(move |_| {
            started_tx.send(()).unwrap();
            release_rx.recv_timeout(Duration::from_secs(10)).ok();
        });
        started_rx.recv_timeout(WAIT).unwrap();

        let started = std::time::Instant::now();
        drop(executor);
        assert!(started.elapsed() < Duration::from_secs(1));

        drop(release_tx);
    }

    #[test]
    fn drop_should_join_an_idle_worker() {
        let executor = RequestExecutor::new().unwrap();
        let handle = executor.submit(|_| {});
        assert!(handle.wait_timeout(WAIT));

        drop(executor);
        assert!(handle.is_finished());
    }
}
