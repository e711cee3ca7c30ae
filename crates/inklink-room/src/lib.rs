//! Room session coordination for Inklink.
//!
//! Each live room runs as an isolated Tokio task (actor model) that owns
//! the round state machine: drawer rotation, word choice with a timeout
//! fallback, guess scoring, and the timers that drive it all. Player
//! commands and timer expiry reach a room through the same sequential
//! loop, so they can never interleave.
//!
//! # Key types
//!
//! - [`RoomRegistry`]: creates, revives, and tears down room sessions;
//!   routes every inbound event to the addressed room
//! - [`RoomHandle`]: send commands to a running room session
//! - [`RoundPhase`] / [`RoomTimer`]: the state machine and its deadlines
//! - [`RoomConfig`]: timeouts, delays, candidate count
//! - [`Broadcaster`]: the outbound seam to the transport collaborator
//! - [`WordCatalog`] / [`select_candidates`]: where words come from
//! - [`award`]: latency → XP

mod broadcast;
mod config;
mod error;
pub mod hint;
mod registry;
mod room;
mod scoring;
mod words;

pub use broadcast::{Broadcaster, ChannelBroadcaster};
pub use config::{RoomConfig, RoomTimer, RoundPhase};
pub use error::RoomError;
pub use registry::RoomRegistry;
pub use room::{JoinOutcome, LeaveOutcome, RoomHandle, RoomInfo};
pub use scoring::{award, MAX_AWARD, MIN_AWARD};
pub use words::{
    select_candidates, DifficultyBand, WordCatalog, WordEntry, WordSource, FALLBACK_WORDS,
};
