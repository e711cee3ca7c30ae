//! Error types for the store layer.

use inklink_protocol::UserId;

/// Errors a [`Store`](crate::Store) implementation can report.
///
/// The room core treats every one of these as non-fatal: it logs them and
/// carries on with the round.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing store could not be reached or rejected the operation.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The user has no record (never registered a username).
    #[error("user {0} not found")]
    UserNotFound(UserId),

    /// Another user already holds this username (compared case-insensitively).
    #[error("username {0:?} is already taken")]
    UsernameTaken(String),

    /// The username is empty after trimming.
    #[error("username must not be empty")]
    InvalidUsername,
}
