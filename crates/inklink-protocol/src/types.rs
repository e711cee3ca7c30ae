//! Identity and addressing types shared by every Inklink layer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// Identifier of a user, as issued by the external identity provider.
///
/// The core treats it as an opaque string; it never parses or validates it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Wraps a raw identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for UserId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A validated room code: exactly 4 or 5 characters, each an uppercase
/// ASCII letter or an ASCII digit.
///
/// Codes are chosen by the caller (the room creator); the only way to get a
/// `RoomCode` is through [`RoomCode::parse`], so holding one proves the
/// format check already happened.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoomCode(String);

impl RoomCode {
    /// Minimum code length.
    pub const MIN_LEN: usize = 4;
    /// Maximum code length.
    pub const MAX_LEN: usize = 5;

    /// Validates `raw` and wraps it.
    ///
    /// # Errors
    /// Returns [`ProtocolError::InvalidRoomCode`] if `raw` is not 4–5
    /// uppercase ASCII letters or digits. Lowercase input is rejected, not
    /// normalized.
    pub fn parse(raw: &str) -> Result<Self, ProtocolError> {
        let len_ok = (Self::MIN_LEN..=Self::MAX_LEN).contains(&raw.len());
        let chars_ok = raw
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit());
        if len_ok && chars_ok {
            Ok(Self(raw.to_owned()))
        } else {
            Err(ProtocolError::InvalidRoomCode(raw.to_owned()))
        }
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RoomCode {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for RoomCode {
    type Error = ProtocolError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RoomCode> for String {
    fn from(code: RoomCode) -> Self {
        code.0
    }
}

// ---------------------------------------------------------------------------
// Recipient
// ---------------------------------------------------------------------------

/// Who inside a room should receive an outbound event.
///
/// The room session pairs every [`ServerEvent`](crate::ServerEvent) it
/// produces with a `Recipient`; the broadcaster resolves it against the
/// room's current member list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recipient {
    /// Every member of the room.
    All,
    /// One member only (private delivery: word choices, word reveal).
    User(UserId),
    /// Every member except one (stroke relay, join notices).
    AllExcept(UserId),
}

impl Recipient {
    /// Returns `true` if `user` is addressed by this recipient.
    pub fn includes(&self, user: &UserId) -> bool {
        match self {
            Self::All => true,
            Self::User(target) => target == user,
            Self::AllExcept(excluded) => excluded != user,
        }
    }
}

// ---------------------------------------------------------------------------
// Stroke
// ---------------------------------------------------------------------------

/// One line segment drawn by the drawer.
///
/// The core stores and relays strokes verbatim; it never interprets the
/// coordinates or the color string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stroke {
    pub start_x: f64,
    pub start_y: f64,
    pub end_x: f64,
    pub end_y: f64,
    pub color: String,
    pub size: f64,
}
