//! Scheduler types and traits
//!
//! Defines the scheduling capability consumed by the authenticator.

use futures::future::BoxFuture;
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// A deferred unit of work, run at most once
pub type Job = Box<dyn FnOnce() -> BoxFuture<'static, ()> + Send + 'static>;

/// Capability to run a job once after a delay
pub trait Scheduler: Send + Sync {
    /// Schedule `job` to run once after `delay`.
    ///
    /// The returned handle cancels the job if it has not started yet.
    fn schedule_once(&self, job: Job, delay: Duration) -> Box<dyn JobHandle>;
}

/// Handle to a scheduled job
pub trait JobHandle: Send + Sync {
    /// Cancel the job. A job that has already started is left to finish.
    fn cancel(&self);

    /// Whether the job is still waiting to fire
    fn is_active(&self) -> bool;
}

const PENDING: u8 = 0;
const RUNNING: u8 = 1;
const CANCELLED: u8 = 2;
const DONE: u8 = 3;

/// Lifecycle of one scheduled job, shared between the timer and its handle
///
/// Transitions are `pending -> running -> done` or `pending -> cancelled`.
#[derive(Clone, Default)]
pub struct JobState {
    inner: Arc<AtomicU8>,
}

impl JobState {
    /// Create a new pending state
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the job for execution. Returns false if it was cancelled.
    pub fn try_fire(&self) -> bool {
        self.inner
            .compare_exchange(PENDING, RUNNING, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Cancel the job. Returns false if it already fired or was cancelled.
    pub fn try_cancel(&self) -> bool {
        self.inner
            .compare_exchange(PENDING, CANCELLED, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Mark a running job as finished
    pub fn finish(&self) {
        self.inner.store(DONE, Ordering::Release);
    }

    /// Still waiting to fire
    pub fn is_pending(&self) -> bool {
        self.inner.load(Ordering::Acquire) == PENDING
    }

    /// Cancelled before it fired
    pub fn is_cancelled(&self) -> bool {
        self.inner.load(Ordering::Acquire) == CANCELLED
    }
}

impl fmt::Debug for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.inner.load(Ordering::Acquire) {
            PENDING => "pending",
            RUNNING => "running",
            CANCELLED => "cancelled",
            _ => "done",
        };
        f.debug_tuple("JobState").field(&state).finish()
    }
}
