//! Error types for the room layer.

use inklink_protocol::{RoomCode, UserId};

/// Errors returned by room and registry operations.
///
/// Every variant is recoverable: the request is rejected, the room's state
/// is left untouched, and the caller reports [`kind`](Self::kind) back to
/// the offending user.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// The code is not 4–5 uppercase letters or digits.
    #[error("invalid room code {0:?}: use 4-5 uppercase letters or digits")]
    InvalidRoomCode(String),

    /// A live session or a durable record already uses this code.
    #[error("room {0} already exists")]
    RoomExists(RoomCode),

    /// No durable record (and no live session) for this code.
    #[error("room {0} not found")]
    RoomNotFound(RoomCode),

    /// Someone other than the drawer tried to choose or clear, or a
    /// non-host tried to edit the word list.
    #[error("{user} may not {action}")]
    UnauthorizedAction { user: UserId, action: &'static str },

    /// A word choice that doesn't match the current candidates, or that
    /// arrived after the choice was already resolved.
    #[error("word choice {0:?} is no longer valid")]
    StaleChoice(String),

    /// The user is not a member of this room.
    #[error("{0} is not in room {1}")]
    NotInRoom(UserId, RoomCode),

    /// The room's session stopped, or its durable record could not be
    /// read or written.
    #[error("room {0} is unavailable")]
    Unavailable(RoomCode),
}

impl RoomError {
    /// Stable machine-readable tag, sent to clients in `room-error`.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidRoomCode(_) => "invalid-room-code",
            Self::RoomExists(_) => "room-exists",
            Self::RoomNotFound(_) => "room-not-found",
            Self::UnauthorizedAction { .. } => "unauthorized-action",
            Self::StaleChoice(_) => "stale-choice",
            Self::NotInRoom(..) => "not-in-room",
            Self::Unavailable(_) => "room-unavailable",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_tags() {
        let code = RoomCode::parse("AB12").unwrap();
        assert_eq!(RoomError::InvalidRoomCode("x".into()).kind(), "invalid-room-code");
        assert_eq!(RoomError::RoomExists(code.clone()).kind(), "room-exists");
        assert_eq!(RoomError::RoomNotFound(code).kind(), "room-not-found");
        assert_eq!(RoomError::StaleChoice("tree".into()).kind(), "stale-choice");
    }

    #[test]
    fn test_unauthorized_message() {
        let err = RoomError::UnauthorizedAction {
            user: UserId::from("u2"),
            action: "clear the canvas",
        };
        assert_eq!(err.to_string(), "u2 may not clear the canvas");
        assert_eq!(err.kind(), "unauthorized-action");
    }
}
