//! Tokio-backed scheduler

use super::types::{Job, JobHandle, JobState, Scheduler};
use std::time::Duration;
use tokio::task::AbortHandle;
use tracing::debug;

/// Scheduler that runs each job in its own tokio task after sleeping.
///
/// Must be used from within a tokio runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioScheduler;

impl TokioScheduler {
    /// Create a new tokio scheduler
    pub fn new() -> Self {
        Self
    }
}

impl Scheduler for TokioScheduler {
    fn schedule_once(&self, job: Job, delay: Duration) -> Box<dyn JobHandle> {
        let state = JobState::new();
        let task_state = state.clone();

        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if task_state.try_fire() {
                job().await;
                task_state.finish();
            }
        });

        debug!(delay_secs = delay.as_secs(), "scheduled job");
        Box::new(TokioJobHandle {
            state,
            abort: task.abort_handle(),
        })
    }
}

struct TokioJobHandle {
    state: JobState,
    abort: AbortHandle,
}

impl JobHandle for TokioJobHandle {
    fn cancel(&self) {
        // Only a job still sleeping is aborted; a running job may be the caller.
        if self.state.try_cancel() {
            self.abort.abort();
        }
    }

    fn is_active(&self) -> bool {
        self.state.is_pending()
    }
}
