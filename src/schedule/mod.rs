//! Scheduling module
//!
//! Single-shot delayed jobs with cancellable handles.
//!
//! # Overview
//!
//! The authenticator arms at most one renewal at a time through the
//! [`Scheduler`] trait. Two implementations are provided:
//!
//! - [`TokioScheduler`]: sleeps on the tokio timer in a spawned task
//! - [`ManualScheduler`]: host-driven clock, advanced explicitly

mod manual;
mod runtime;
mod types;

pub use manual::ManualScheduler;
pub use runtime::TokioScheduler;
pub use types::{Job, JobHandle, JobState, Scheduler};

#[cfg(test)]
mod tests;
