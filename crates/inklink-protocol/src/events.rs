//! The event vocabulary: what the core emits and what users may send.
//!
//! Event names and payload field names are the compatibility surface with
//! existing clients, so both enums are adjacently tagged:
//!
//! ```text
//! { "event": "correct-guess", "payload": { "guesserName": "ann", "xp": 92, "word": "tree" } }
//! ```

use serde::{Deserialize, Serialize};

use crate::{Stroke, UserId};

// ---------------------------------------------------------------------------
// Outbound
// ---------------------------------------------------------------------------

/// Events produced by the room core and handed to the broadcaster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "event",
    content = "payload",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum ServerEvent {
    /// A new round began. `word_hint_mask` is blank while the drawer is
    /// still choosing.
    RoundStart {
        drawer_id: UserId,
        drawer_username: String,
        word_hint_mask: String,
    },
    /// Drawer only: the candidate words to pick from.
    WordChoices { options: Vec<String> },
    /// The current hint: masked after a choice, the full word after a reveal.
    WordChosenHint { mask: String },
    /// Drawer only: the word to draw.
    WordReveal { word: String },
    /// A stroke relayed from the drawer.
    Stroke(Stroke),
    /// Reset the canvas.
    Clear,
    /// Full stroke history for a (re)joining member.
    CanvasSync { strokes: Vec<Stroke> },
    /// Someone guessed the word.
    CorrectGuess {
        guesser_name: String,
        xp: u32,
        word: String,
    },
    /// Nobody guessed the word in time.
    TimeUp { word: String },
    /// Current rotation order; the first id is the drawer.
    PlayerList { ids: Vec<UserId> },
    PlayerJoined { user_id: UserId, username: String },
    PlayerLeft { user_id: UserId },
    /// The drawer left mid-round and the next player took over.
    DrawerChanged {
        drawer_id: UserId,
        drawer_username: String,
    },
    /// A chat line (any guess that did not score).
    Chat {
        user_id: UserId,
        username: String,
        text: String,
    },
    /// Private: the user's updated score.
    UserScore { xp: u64, level: u32 },
    RoomCreated { room_id: String },
    RoomJoined { room_id: String },
    UsernameStatus { username: String, available: bool },
    UsernameRegistered { username: String },
    /// Private: a rejected request. `kind` is a stable machine-readable tag.
    RoomError { kind: String, message: String },
}

impl ServerEvent {
    /// The wire name of this event (`"round-start"`, `"time-up"`, ...).
    pub fn name(&self) -> &'static str {
        match self {
            Self::RoundStart { .. } => "round-start",
            Self::WordChoices { .. } => "word-choices",
            Self::WordChosenHint { .. } => "word-chosen-hint",
            Self::WordReveal { .. } => "word-reveal",
            Self::Stroke(_) => "stroke",
            Self::Clear => "clear",
            Self::CanvasSync { .. } => "canvas-sync",
            Self::CorrectGuess { .. } => "correct-guess",
            Self::TimeUp { .. } => "time-up",
            Self::PlayerList { .. } => "player-list",
            Self::PlayerJoined { .. } => "player-joined",
            Self::PlayerLeft { .. } => "player-left",
            Self::DrawerChanged { .. } => "drawer-changed",
            Self::Chat { .. } => "chat",
            Self::UserScore { .. } => "user-score",
            Self::RoomCreated { .. } => "room-created",
            Self::RoomJoined { .. } => "room-joined",
            Self::UsernameStatus { .. } => "username-status",
            Self::UsernameRegistered { .. } => "username-registered",
            Self::RoomError { .. } => "room-error",
        }
    }
}

// ---------------------------------------------------------------------------
// Inbound
// ---------------------------------------------------------------------------

/// Commands a connected user can send.
///
/// The sender's identity is not part of the payload; the transport
/// attaches the authenticated [`UserId`] when it hands the command over.
/// Room codes stay raw strings here so that a malformed code reaches the
/// registry and is reported as `invalid-room-code` instead of failing
/// decoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "event",
    content = "payload",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum ClientCommand {
    CreateRoom { room_id: String },
    JoinRoom { room_id: String },
    LeaveRoom { room_id: String },
    ChooseWord { room_id: String, word: String },
    Stroke { room_id: String, stroke: Stroke },
    ClearCanvas { room_id: String },
    Guess { room_id: String, text: String },
    CheckUsername { username: String },
    RegisterUsername { username: String },
    GetScore,
}
