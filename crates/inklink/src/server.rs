//! `GameServer` builder and shared state.
//!
//! The server ties the layers together: protocol (commands, codec) →
//! room registry → store and broadcaster. It owns no sockets; a transport
//! feeds it commands via [`GameServer::dispatch`] and delivers what the
//! [`Broadcaster`] emits.

use std::sync::Arc;

use inklink_protocol::{Codec, JsonCodec, ServerEvent};
use inklink_room::{Broadcaster, RoomConfig, RoomRegistry, WordCatalog};
use inklink_store::Store;

use crate::InklinkError;

/// Builder for a [`GameServer`].
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use std::time::Duration;
/// use inklink::prelude::*;
///
/// let server = GameServerBuilder::new()
///     .room_config(RoomConfig {
///         guess_timeout: Duration::from_secs(90),
///         ..RoomConfig::default()
///     })
///     .build(Arc::new(MemoryStore::new()), Arc::new(ChannelBroadcaster::new()));
/// ```
#[derive(Debug, Clone, Default)]
pub struct GameServerBuilder {
    room_config: RoomConfig,
    catalog: WordCatalog,
}

impl GameServerBuilder {
    /// A builder with default timings and an empty catalog (rooms fall
    /// back to the built-in words until a catalog is set).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the timings and sizes every room uses.
    pub fn room_config(mut self, config: RoomConfig) -> Self {
        self.room_config = config;
        self
    }

    /// Sets the shared word catalog.
    pub fn catalog(mut self, catalog: WordCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Builds the server over the given collaborators, encoding with
    /// [`JsonCodec`].
    pub fn build<S: Store, B: Broadcaster>(self, store: Arc<S>, broadcaster: Arc<B>) -> GameServer<S, B> {
        self.build_with_codec(store, broadcaster, JsonCodec)
    }

    /// Builds the server with a custom wire codec.
    pub fn build_with_codec<S: Store, B: Broadcaster, C: Codec>(
        self,
        store: Arc<S>,
        broadcaster: Arc<B>,
        codec: C,
    ) -> GameServer<S, B, C> {
        tracing::info!(
            catalog = self.catalog.len(),
            guess_timeout_ms = self.room_config.guess_timeout.as_millis() as u64,
            "inklink server built"
        );
        GameServer {
            registry: RoomRegistry::new(store, broadcaster, self.catalog, self.room_config),
            codec,
        }
    }
}

/// The room coordinator with its collaborators attached.
///
/// Share it across connection tasks with an `Arc`; every method takes
/// `&self`.
pub struct GameServer<S: Store, B: Broadcaster, C: Codec = JsonCodec> {
    pub(crate) registry: RoomRegistry<S, B>,
    pub(crate) codec: C,
}

impl<S: Store, B: Broadcaster, C: Codec> GameServer<S, B, C> {
    /// The room registry, for direct room operations and introspection.
    pub fn registry(&self) -> &RoomRegistry<S, B> {
        &self.registry
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Encodes an outbound event for the wire.
    pub fn encode(&self, event: &ServerEvent) -> Result<Vec<u8>, InklinkError> {
        Ok(self.codec.encode(event)?)
    }
}
