//! Durable-store contract for Inklink.
//!
//! The room core persists two kinds of records and never cares how:
//!
//! - [`RoomRecord`]: written once when a room is created, read at every
//!   round start to decide where candidate words come from.
//! - [`UserRecord`]: usernames, XP, level, and cosmetics, shared across
//!   rooms and mutated only by the scoring path.
//!
//! The [`Store`] trait is the seam; [`MemoryStore`] is the in-process
//! implementation used by tests and single-node deployments.
//!
//! # How it fits in the stack
//!
//! ```text
//! Room Layer (above)  ← reads word sources, awards XP
//!     ↕
//! Store Layer (this crate)  ← records + Store trait
//!     ↕
//! Protocol Layer (below)  ← provides UserId, RoomCode
//! ```

#![allow(async_fn_in_trait)]

mod error;
mod memory;
mod record;
mod store;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use record::{
    level_for_xp, RoomRecord, UserRecord, WordListSource, DEFAULT_COSMETICS,
};
pub use store::Store;
