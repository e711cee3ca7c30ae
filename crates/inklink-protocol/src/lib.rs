//! Wire vocabulary for Inklink.
//!
//! This crate defines everything that crosses the boundary between the
//! room core and the transport collaborator:
//!
//! - **Identifiers** ([`UserId`], [`RoomCode`]) and the [`Recipient`]
//!   addressing enum.
//! - **Events** ([`ServerEvent`]): the stable outbound vocabulary
//!   (`round-start`, `word-choices`, `correct-guess`, ...).
//! - **Commands** ([`ClientCommand`]): what a connected user can ask for.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how events and commands
//!   become bytes.
//!
//! ```text
//! Transport (bytes) → Protocol (ClientCommand / ServerEvent) → Room core
//! ```

mod codec;
mod error;
mod events;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use events::{ClientCommand, ServerEvent};
pub use types::{Recipient, RoomCode, Stroke, UserId};
