//! Integration tests for the single-slot turn scheduler.
//!
//! Uses `start_paused = true` so the Tokio clock only moves when every
//! task is idle; deadlines of 5 s or 60 s resolve instantly and exactly.

use std::time::Duration;

use inklink_timer::TurnScheduler;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Choice,
    Guess,
}

// =========================================================================
// Arming and cancelling
// =========================================================================

#[test]
fn test_new_scheduler_is_disarmed() {
    let s = TurnScheduler::<Kind>::new();
    assert!(!s.is_armed());
    assert_eq!(s.armed(), None);
    assert_eq!(s.remaining(), None);
    assert_eq!(s.metrics().armed, 0);
}

#[tokio::test(start_paused = true)]
async fn test_arm_replaces_previous_deadline() {
    let mut s = TurnScheduler::new();
    let first = s.arm(Kind::Choice, Duration::from_secs(5));
    let second = s.arm(Kind::Guess, Duration::from_secs(60));

    assert!(second > first);
    assert_eq!(s.armed(), Some(Kind::Guess));
    assert_eq!(s.metrics().armed, 2);
    assert_eq!(s.metrics().replaced, 1);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_returns_kind_and_disarms() {
    let mut s = TurnScheduler::new();
    s.arm(Kind::Choice, Duration::from_secs(5));

    assert_eq!(s.cancel(), Some(Kind::Choice));
    assert!(!s.is_armed());
    assert_eq!(s.cancel(), None);
    assert_eq!(s.metrics().cancelled, 1);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_kind_only_matches_armed_kind() {
    let mut s = TurnScheduler::new();
    s.arm(Kind::Guess, Duration::from_secs(60));

    assert!(!s.cancel_kind(Kind::Choice));
    assert_eq!(s.armed(), Some(Kind::Guess));
    assert!(s.cancel_kind(Kind::Guess));
    assert!(!s.is_armed());
}

#[tokio::test(start_paused = true)]
async fn test_remaining_counts_down() {
    let mut s = TurnScheduler::new();
    s.arm(Kind::Guess, Duration::from_secs(60));
    tokio::time::advance(Duration::from_secs(15)).await;
    assert_eq!(s.remaining(), Some(Duration::from_secs(45)));
}

// =========================================================================
// Firing
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_wait_fires_at_deadline() {
    let mut s = TurnScheduler::new();
    let start = Instant::now();
    let generation = s.arm(Kind::Choice, Duration::from_secs(5));

    let fired = s.wait().await;

    assert_eq!(fired.kind, Kind::Choice);
    assert_eq!(fired.generation, generation);
    assert_eq!(start.elapsed(), Duration::from_secs(5));
    assert!(!s.is_armed(), "firing disarms the slot");
    assert_eq!(s.metrics().fired, 1);
}

#[tokio::test(start_paused = true)]
async fn test_only_latest_deadline_fires() {
    let mut s = TurnScheduler::new();
    let start = Instant::now();
    s.arm(Kind::Choice, Duration::from_secs(5));
    s.arm(Kind::Guess, Duration::from_secs(60));

    let fired = s.wait().await;
    assert_eq!(fired.kind, Kind::Guess);
    assert_eq!(start.elapsed(), Duration::from_secs(60));
}

#[tokio::test(start_paused = true)]
async fn test_wait_pends_when_disarmed() {
    let mut s = TurnScheduler::<Kind>::new();
    let result = tokio::time::timeout(Duration::from_secs(3600), s.wait()).await;
    assert!(result.is_err(), "a disarmed scheduler never fires");
}

#[tokio::test(start_paused = true)]
async fn test_wait_is_cancel_safe_in_select() {
    let mut s = TurnScheduler::new();
    s.arm(Kind::Choice, Duration::from_secs(5));

    // A competing branch wins first; the deadline must survive.
    tokio::select! {
        _ = s.wait() => panic!("deadline should not fire before the sleep"),
        _ = tokio::time::sleep(Duration::from_secs(1)) => {}
    }
    assert_eq!(s.armed(), Some(Kind::Choice));

    let fired = s.wait().await;
    assert_eq!(fired.kind, Kind::Choice);
}

#[tokio::test(start_paused = true)]
async fn test_fired_reports_lateness() {
    let mut s = TurnScheduler::new();
    s.arm(Kind::Choice, Duration::from_secs(5));
    tokio::time::advance(Duration::from_secs(7)).await;

    let fired = s.wait().await;
    assert_eq!(fired.late_by, Duration::from_secs(2));
}
