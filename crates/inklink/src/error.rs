//! Unified error type for Inklink.

use inklink_protocol::ProtocolError;
use inklink_room::RoomError;
use inklink_store::StoreError;

/// Top-level error wrapping every layer's error.
///
/// `#[from]` lets `?` lift layer errors into this one.
#[derive(Debug, thiserror::Error)]
pub enum InklinkError {
    /// A frame could not be decoded or an event encoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A rejected room operation.
    #[error(transparent)]
    Room(#[from] RoomError),

    /// A failed profile operation.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl InklinkError {
    /// Stable tag reported to the user in `room-error`.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Protocol(_) => "invalid-message",
            Self::Room(e) => e.kind(),
            Self::Store(StoreError::UsernameTaken(_)) => "username-taken",
            Self::Store(StoreError::InvalidUsername) => "invalid-username",
            Self::Store(StoreError::UserNotFound(_)) => "user-not-found",
            Self::Store(StoreError::Unavailable(_)) => "store-unavailable",
        }
    }
}
