//! Host-driven scheduler
//!
//! Jobs fire only when the owner advances the clock. Useful when the host
//! already runs its own event loop, and in tests.

use super::types::{Job, JobHandle, JobState, Scheduler};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

struct Entry {
    due: Duration,
    job: Option<Job>,
    state: JobState,
}

#[derive(Default)]
struct Clock {
    now: Duration,
    entries: Vec<Entry>,
    scheduled: usize,
}

/// Scheduler with an explicit, manually advanced clock
#[derive(Default)]
pub struct ManualScheduler {
    clock: Mutex<Clock>,
}

impl ManualScheduler {
    /// Create a scheduler with its clock at zero
    pub fn new() -> Self {
        Self::default()
    }

    fn clock(&self) -> MutexGuard<'_, Clock> {
        self.clock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of jobs waiting to fire
    pub fn pending(&self) -> usize {
        self.clock()
            .entries
            .iter()
            .filter(|e| e.state.is_pending())
            .count()
    }

    /// Total number of jobs ever scheduled
    pub fn scheduled(&self) -> usize {
        self.clock().scheduled
    }

    /// Time elapsed on the manual clock
    pub fn now(&self) -> Duration {
        self.clock().now
    }

    /// Delay until the earliest pending job, if any
    pub fn next_due_in(&self) -> Option<Duration> {
        let clock = self.clock();
        clock
            .entries
            .iter()
            .filter(|e| e.state.is_pending())
            .map(|e| e.due.saturating_sub(clock.now))
            .min()
    }

    /// Advance the clock and run every job that became due.
    ///
    /// Jobs scheduled while running wait for a later advance.
    /// Returns the number of jobs run.
    pub async fn advance(&self, by: Duration) -> usize {
        let due = {
            let mut clock = self.clock();
            clock.now += by;
            let now = clock.now;

            let mut due = Vec::new();
            for entry in &mut clock.entries {
                if entry.due <= now && entry.state.try_fire() {
                    if let Some(job) = entry.job.take() {
                        due.push((job, entry.state.clone()));
                    }
                }
            }
            clock.entries.retain(|e| e.state.is_pending());
            due
        };

        let count = due.len();
        for (job, state) in due {
            job().await;
            state.finish();
        }
        count
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_once(&self, job: Job, delay: Duration) -> Box<dyn JobHandle> {
        let state = JobState::new();
        let mut clock = self.clock();
        let due = clock.now + delay;
        clock.entries.push(Entry {
            due,
            job: Some(job),
            state: state.clone(),
        });
        clock.scheduled += 1;
        Box::new(ManualJobHandle { state })
    }
}

struct ManualJobHandle {
    state: JobState,
}

impl JobHandle for ManualJobHandle {
    fn cancel(&self) {
        self.state.try_cancel();
    }

    fn is_active(&self) -> bool {
        self.state.is_pending()
    }
}
