//! Single-slot deadline scheduler for Inklink rooms.
//!
//! A room only ever waits on one thing at a time: the drawer's word choice,
//! the guessing window, or the pause before the next round. A
//! [`TurnScheduler`] holds at most one armed deadline; arming a new one
//! replaces (cancels) whatever was armed before, so two deadlines can never
//! race each other into a double round start.
//!
//! # Integration
//!
//! The scheduler sits inside a room actor's `tokio::select!` loop, next to
//! the command channel. Timer expiry and player commands then reach the
//! room through the same sequential path:
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         Some(cmd) = cmd_rx.recv() => { /* handle command, maybe arm/cancel */ }
//!         fired = scheduler.wait() => { /* re-validate phase, then act */ }
//!     }
//! }
//! ```
//!
//! [`TurnScheduler::wait`] is cancel-safe: if the command branch wins, the
//! armed deadline stays in place and the next `wait` picks it up again.

use std::fmt;
use std::time::Duration;

use tokio::time::{self, Instant};
use tracing::{debug, trace};

// ---------------------------------------------------------------------------
// Fired
// ---------------------------------------------------------------------------

/// A deadline that expired, returned by [`TurnScheduler::wait`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fired<K> {
    /// What the deadline was armed for.
    pub kind: K,
    /// The generation returned by the [`arm`](TurnScheduler::arm) call that
    /// set this deadline.
    pub generation: u64,
    /// How long after the deadline the expiry was observed.
    pub late_by: Duration,
}

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

/// Counters describing a scheduler's history.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimerMetrics {
    /// Total deadlines armed.
    pub armed: u64,
    /// Deadlines discarded because a newer one was armed over them.
    pub replaced: u64,
    /// Deadlines removed by an explicit cancel.
    pub cancelled: u64,
    /// Deadlines that expired and were delivered by `wait`.
    pub fired: u64,
}

// ---------------------------------------------------------------------------
// Scheduler
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
struct Armed<K> {
    kind: K,
    deadline: Instant,
    generation: u64,
}

/// Holds at most one pending deadline for a single room.
///
/// `K` names what a deadline is for (word choice, guessing, ...). The
/// scheduler never interprets it; it only hands it back on expiry.
#[derive(Debug)]
pub struct TurnScheduler<K> {
    slot: Option<Armed<K>>,
    next_generation: u64,
    metrics: TimerMetrics,
}

impl<K> TurnScheduler<K>
where
    K: Copy + PartialEq + fmt::Debug,
{
    /// Creates a scheduler with nothing armed.
    pub fn new() -> Self {
        Self {
            slot: None,
            next_generation: 1,
            metrics: TimerMetrics::default(),
        }
    }

    /// Arms a deadline `after` from now, replacing any armed deadline.
    ///
    /// Returns the generation of the new deadline. Generations strictly
    /// increase, so a [`Fired`] can always be matched to the arm call that
    /// produced it.
    pub fn arm(&mut self, kind: K, after: Duration) -> u64 {
        let generation = self.next_generation;
        self.next_generation += 1;

        if let Some(previous) = self.slot.take() {
            self.metrics.replaced += 1;
            debug!(
                replaced = ?previous.kind,
                with = ?kind,
                "armed deadline replaced"
            );
        }

        self.slot = Some(Armed {
            kind,
            deadline: Instant::now() + after,
            generation,
        });
        self.metrics.armed += 1;
        trace!(?kind, generation, after_ms = after.as_millis() as u64, "deadline armed");
        generation
    }

    /// Cancels whatever is armed. Returns the kind that was cancelled.
    pub fn cancel(&mut self) -> Option<K> {
        let cancelled = self.slot.take().map(|armed| armed.kind);
        if let Some(kind) = cancelled {
            self.metrics.cancelled += 1;
            trace!(?kind, "deadline cancelled");
        }
        cancelled
    }

    /// Cancels the armed deadline only if it is of `kind`.
    ///
    /// Returns `true` if something was cancelled.
    pub fn cancel_kind(&mut self, kind: K) -> bool {
        match self.slot {
            Some(armed) if armed.kind == kind => {
                self.cancel();
                true
            }
            _ => false,
        }
    }

    /// The kind of the armed deadline, if any.
    pub fn armed(&self) -> Option<K> {
        self.slot.map(|armed| armed.kind)
    }

    /// Whether a deadline is armed.
    pub fn is_armed(&self) -> bool {
        self.slot.is_some()
    }

    /// Time left until the armed deadline (zero if already overdue).
    pub fn remaining(&self) -> Option<Duration> {
        self.slot
            .map(|armed| armed.deadline.saturating_duration_since(Instant::now()))
    }

    /// Waits until the armed deadline expires, disarms it, and returns it.
    ///
    /// With nothing armed this future pends forever; inside
    /// `tokio::select!` the other branches keep running.
    pub async fn wait(&mut self) -> Fired<K> {
        let deadline = match &self.slot {
            Some(armed) => armed.deadline,
            None => return std::future::pending().await,
        };

        time::sleep_until(deadline).await;

        // `&mut self` is held across the sleep, so the slot cannot have
        // changed underneath us.
        let Some(armed) = self.slot.take() else {
            return std::future::pending().await;
        };
        self.metrics.fired += 1;
        let late_by = Instant::now().saturating_duration_since(armed.deadline);
        trace!(kind = ?armed.kind, generation = armed.generation, "deadline fired");

        Fired {
            kind: armed.kind,
            generation: armed.generation,
            late_by,
        }
    }

    /// Snapshot of the scheduler's counters.
    pub fn metrics(&self) -> &TimerMetrics {
        &self.metrics
    }
}

impl<K> Default for TurnScheduler<K>
where
    K: Copy + PartialEq + fmt::Debug,
{
    fn default() -> Self {
        Self::new()
    }
}
