//! Tests for the schedule module

use super::*;
use futures::FutureExt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn counting_job(counter: &Arc<AtomicUsize>) -> Job {
    let counter = counter.clone();
    Box::new(move || {
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
        }
        .boxed()
    })
}

// ============================================================================
// JobState Tests
// ============================================================================

#[test]
fn test_job_state_fire_then_cancel() {
    let state = JobState::new();
    assert!(state.is_pending());
    assert!(state.try_fire());
    assert!(!state.is_pending());
    assert!(!state.try_cancel());
    assert!(!state.is_cancelled());
}

#[test]
fn test_job_state_cancel_then_fire() {
    let state = JobState::new();
    assert!(state.try_cancel());
    assert!(state.is_cancelled());
    assert!(!state.try_fire());
}

// ============================================================================
// ManualScheduler Tests
// ============================================================================

#[tokio::test]
async fn test_manual_scheduler_fires_when_due() {
    let scheduler = ManualScheduler::new();
    let counter = Arc::new(AtomicUsize::new(0));

    let handle = scheduler.schedule_once(counting_job(&counter), Duration::from_secs(10));
    assert!(handle.is_active());
    assert_eq!(scheduler.pending(), 1);
    assert_eq!(scheduler.next_due_in(), Some(Duration::from_secs(10)));

    assert_eq!(scheduler.advance(Duration::from_secs(9)).await, 0);
    assert_eq!(counter.load(Ordering::SeqCst), 0);

    assert_eq!(scheduler.advance(Duration::from_secs(1)).await, 1);
    assert_eq!(counter.load(Ordering::SeqCst), 1);
    assert!(!handle.is_active());
    assert_eq!(scheduler.pending(), 0);
    assert_eq!(scheduler.now(), Duration::from_secs(10));
}

#[tokio::test]
async fn test_manual_scheduler_cancelled_job_never_runs() {
    let scheduler = ManualScheduler::new();
    let counter = Arc::new(AtomicUsize::new(0));

    let handle = scheduler.schedule_once(counting_job(&counter), Duration::from_secs(5));
    handle.cancel();
    assert!(!handle.is_active());
    assert_eq!(scheduler.pending(), 0);

    assert_eq!(scheduler.advance(Duration::from_secs(60)).await, 0);
    assert_eq!(counter.load(Ordering::SeqCst), 0);
    assert_eq!(scheduler.scheduled(), 1);
}

#[tokio::test]
async fn test_manual_scheduler_jobs_scheduled_while_running_wait() {
    let scheduler = Arc::new(ManualScheduler::new());
    let counter = Arc::new(AtomicUsize::new(0));

    let inner_scheduler = scheduler.clone();
    let inner_counter = counter.clone();
    let job: Job = Box::new(move || {
        async move {
            inner_counter.fetch_add(1, Ordering::SeqCst);
            let follow_up = counting_job(&inner_counter);
            let _handle = inner_scheduler.schedule_once(follow_up, Duration::from_secs(5));
        }
        .boxed()
    });

    let _handle = scheduler.schedule_once(job, Duration::from_secs(5));
    assert_eq!(scheduler.advance(Duration::from_secs(5)).await, 1);
    assert_eq!(counter.load(Ordering::SeqCst), 1);
    assert_eq!(scheduler.pending(), 1);

    assert_eq!(scheduler.advance(Duration::from_secs(5)).await, 1);
    assert_eq!(counter.load(Ordering::SeqCst), 2);
    assert_eq!(scheduler.pending(), 0);
}

// ============================================================================
// TokioScheduler Tests
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_tokio_scheduler_fires_after_delay() {
    let scheduler = TokioScheduler::new();
    let counter = Arc::new(AtomicUsize::new(0));

    let handle = scheduler.schedule_once(counting_job(&counter), Duration::from_secs(30));
    assert!(handle.is_active());

    tokio::time::sleep(Duration::from_secs(29)).await;
    assert_eq!(counter.load(Ordering::SeqCst), 0);

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(counter.load(Ordering::SeqCst), 1);
    assert!(!handle.is_active());
}

#[tokio::test(start_paused = true)]
async fn test_tokio_scheduler_cancel_before_fire() {
    let scheduler = TokioScheduler::new();
    let counter = Arc::new(AtomicUsize::new(0));

    let handle = scheduler.schedule_once(counting_job(&counter), Duration::from_secs(30));
    handle.cancel();
    assert!(!handle.is_active());

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(counter.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn test_tokio_scheduler_cancel_after_fire_is_noop() {
    let scheduler = TokioScheduler::new();
    let counter = Arc::new(AtomicUsize::new(0));

    let handle = scheduler.schedule_once(counting_job(&counter), Duration::from_secs(1));
    tokio::time::sleep(Duration::from_secs(2)).await;
    handle.cancel();

    assert_eq!(counter.load(Ordering::SeqCst), 1);
    assert!(!handle.is_active());
}
