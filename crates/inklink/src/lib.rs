//! # Inklink
//!
//! Room session coordinator for a real-time draw-and-guess game.
//!
//! Inklink runs many independent rooms, each cycling through rounds of
//! pick a word → draw → guess → score → rotate the drawer, under strict
//! timing and authorization rules. Each room is its own Tokio task; the
//! only shared structure is the registry mapping room codes to sessions.
//!
//! The transport (sockets, HTTP) and the durable store stay outside: plug
//! them in through the [`Broadcaster`](inklink_room::Broadcaster) and
//! [`Store`](inklink_store::Store) traits.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use inklink::prelude::*;
//!
//! # async fn run() -> Result<(), InklinkError> {
//! inklink::init_tracing("info");
//!
//! let broadcaster = Arc::new(ChannelBroadcaster::new());
//! let server = GameServerBuilder::new()
//!     .catalog(WordCatalog::from_json(r#"[{"word": "tree", "difficulty": 2}]"#).unwrap_or_default())
//!     .build(Arc::new(MemoryStore::new()), Arc::clone(&broadcaster));
//!
//! let ann = UserId::from("ann");
//! let mut events = broadcaster.connect(&ann);
//! server
//!     .dispatch(&ann, ClientCommand::CreateRoom { room_id: "AB12".into() })
//!     .await?;
//! while let Some(event) = events.recv().await {
//!     println!("{}", event.name());
//! }
//! # Ok(())
//! # }
//! ```

mod error;
mod handler;
mod server;

pub use error::InklinkError;
pub use server::{GameServer, GameServerBuilder};

pub use inklink_protocol as protocol;
pub use inklink_room as room;
pub use inklink_store as store;
pub use inklink_timer as timer;

use tracing_subscriber::EnvFilter;

/// Installs a `tracing` subscriber that logs to stdout.
///
/// `RUST_LOG` wins when set; otherwise `default_directive` (e.g. `"info"`
/// or `"inklink_room=debug"`) is used. Calling it twice is harmless.
pub fn init_tracing(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

/// Common imports for running an Inklink server.
pub mod prelude {
    pub use crate::{GameServer, GameServerBuilder, InklinkError};
    pub use inklink_protocol::{
        ClientCommand, Codec, JsonCodec, RoomCode, ServerEvent, Stroke, UserId,
    };
    pub use inklink_room::{
        Broadcaster, ChannelBroadcaster, RoomConfig, RoomError, RoomInfo, RoomRegistry,
        RoundPhase, WordCatalog, WordEntry,
    };
    pub use inklink_store::{MemoryStore, RoomRecord, Store, StoreError, UserRecord};
}
