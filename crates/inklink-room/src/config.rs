//! Room configuration and round state machine.
//!
//! [`RoomConfig`] carries every timing and sizing knob a room session
//! reads. A registry validates it once and hands the same copy to every
//! session it spawns, so all rooms of a process run on identical clocks.
//!
//! [`RoundPhase`] and [`RoomTimer`] together describe where a room is in
//! its cycle. The phase says what input the room accepts; the timer says
//! what the room is waiting for. Each timer kind belongs to exactly one
//! phase ([`RoomTimer::armed_in`]), which is how a session recognises a
//! deadline that fired after the room already moved on.

use std::time::Duration;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// RoomConfig
// ---------------------------------------------------------------------------

/// Timing and sizing knobs shared by every room a registry spawns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomConfig {
    /// How long the drawer has to pick a word before one is auto-picked.
    pub choice_timeout: Duration,

    /// Length of the guessing window. Also the scoring horizon: a guess
    /// at the very end of the window earns the minimum award.
    pub guess_timeout: Duration,

    /// Pause after a correct guess before the next round starts.
    pub correct_guess_delay: Duration,

    /// Pause after the guessing window runs out before the next round.
    pub time_up_delay: Duration,

    /// Candidate words offered to the drawer each round.
    pub candidate_count: usize,

    /// Upper bound on any single store call made from a room task.
    pub store_timeout: Duration,

    /// Capacity of each room's command channel. Senders wait when full.
    pub command_channel_size: usize,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            choice_timeout: Duration::from_secs(5),
            guess_timeout: Duration::from_secs(60),
            correct_guess_delay: Duration::from_secs(4),
            time_up_delay: Duration::from_secs(3),
            candidate_count: 3,
            store_timeout: Duration::from_secs(2),
            command_channel_size: 64,
        }
    }
}

impl RoomConfig {
    /// Replaces out-of-range values so the config is safe to run with.
    ///
    /// Called by [`RoomRegistry::new`](crate::RoomRegistry::new). Rules:
    /// - zero timeouts or store timeout fall back to the defaults
    ///   (a zero guessing window would make every guess score the minimum);
    /// - `candidate_count` and `command_channel_size` are at least 1.
    pub fn validated(mut self) -> Self {
        let defaults = Self::default();
        if self.choice_timeout.is_zero() {
            tracing::warn!("choice_timeout is zero, using default");
            self.choice_timeout = defaults.choice_timeout;
        }
        if self.guess_timeout.is_zero() {
            tracing::warn!("guess_timeout is zero, using default");
            self.guess_timeout = defaults.guess_timeout;
        }
        if self.store_timeout.is_zero() {
            tracing::warn!("store_timeout is zero, using default");
            self.store_timeout = defaults.store_timeout;
        }
        self.candidate_count = self.candidate_count.max(1);
        self.command_channel_size = self.command_channel_size.max(1);
        self
    }
}

// ---------------------------------------------------------------------------
// RoundPhase
// ---------------------------------------------------------------------------

/// Where a room is in its round cycle.
///
/// ```text
///            valid choice / choice timeout
/// ChoosingWord ───────────────────────────→ Drawing
///      ↑                                       │
///      └──── next-round delay ←── correct guess / guess timeout
/// ```
///
/// There is no terminal phase: a room cycles until its last player leaves
/// or it is torn down. Between a round's resolution and the next round
/// start the room stays in `Drawing` with no current word; guesses in that
/// window cannot score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    ChoosingWord,
    Drawing,
}

impl std::fmt::Display for RoundPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ChoosingWord => write!(f, "ChoosingWord"),
            Self::Drawing => write!(f, "Drawing"),
        }
    }
}

// ---------------------------------------------------------------------------
// RoomTimer
// ---------------------------------------------------------------------------

/// The deadline a room is waiting on. At most one is armed per room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomTimer {
    /// The drawer's time to choose a word.
    WordChoice,
    /// The guessing window.
    Guessing,
    /// The pause between a resolved round and the next round start.
    NextRound,
}

impl RoomTimer {
    /// The phase a room must still be in for this deadline to act.
    pub fn armed_in(self) -> RoundPhase {
        match self {
            Self::WordChoice => RoundPhase::ChoosingWord,
            Self::Guessing | Self::NextRound => RoundPhase::Drawing,
        }
    }
}
