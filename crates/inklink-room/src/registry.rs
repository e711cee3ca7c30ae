//! Room registry: creates, revives, and tracks room sessions, and routes
//! every inbound event to the addressed room.
//!
//! # Live sessions and durable records
//!
//! A room exists in two places. The durable [`RoomRecord`] in the store
//! names the room, its host, and its word list; it outlives every session
//! and only an external inactivity TTL removes it. The live session is the
//! task that runs rounds, and it exists only while somebody is in the room.
//!
//! `create_room` writes both. `join_room` requires the record and spawns a
//! fresh session from it when none is live, which is how a room that
//! emptied out comes back. Rounds, scores and canvases belong to the
//! session and start over on revival.
//!
//! # Stale handles
//!
//! A session can stop between looking its handle up and sending to it.
//! Every spawned session carries a unique id, and the registry only ever
//! removes the exact session it saw stop, so a revived session under the
//! same code is never dropped by a late cleanup.

use std::future::Future;
use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use inklink_protocol::{RoomCode, Stroke, UserId};
use inklink_store::{RoomRecord, Store, StoreError};
use tokio::time;

use crate::room::{Shared, spawn_room};
use crate::{
    Broadcaster, JoinOutcome, LeaveOutcome, RoomConfig, RoomError, RoomHandle, RoomInfo,
    WordCatalog,
};

/// Attempts at joining before giving up on a session that keeps stopping
/// underneath us.
const JOIN_ATTEMPTS: usize = 3;

/// Directory of live room sessions.
///
/// The registry guards only the code → session map and the user → room
/// index. Room state itself lives inside each session task, so operations
/// on different rooms never contend. No map guard is ever held across an
/// `.await`.
pub struct RoomRegistry<S: Store, B: Broadcaster> {
    rooms: DashMap<RoomCode, RoomHandle>,
    /// The room each user is currently in. A user is in at most one room.
    memberships: DashMap<UserId, RoomCode>,
    shared: Shared<S, B>,
}

impl<S: Store, B: Broadcaster> RoomRegistry<S, B> {
    /// Creates an empty registry. `config` is validated first.
    pub fn new(store: Arc<S>, broadcaster: Arc<B>, catalog: WordCatalog, config: RoomConfig) -> Self {
        Self {
            rooms: DashMap::new(),
            memberships: DashMap::new(),
            shared: Shared {
                store,
                broadcaster,
                catalog: Arc::new(catalog),
                config: config.validated(),
            },
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.shared.store
    }

    pub fn broadcaster(&self) -> &Arc<B> {
        &self.shared.broadcaster
    }

    pub fn config(&self) -> &RoomConfig {
        &self.shared.config
    }

    pub fn catalog(&self) -> &WordCatalog {
        &self.shared.catalog
    }

    // -- lifecycle -----------------------------------------------------------

    /// Creates room `code` hosted by `host` and starts its first round with
    /// the host drawing.
    ///
    /// # Errors
    /// - [`RoomError::InvalidRoomCode`] if `code` is malformed
    /// - [`RoomError::RoomExists`] if a live session or durable record
    ///   already uses it
    /// - [`RoomError::Unavailable`] if the store can't be reached
    pub async fn create_room(&self, code: &str, host: &UserId) -> Result<RoomCode, RoomError> {
        let code = parse_code(code)?;
        if self.rooms.contains_key(&code) {
            return Err(RoomError::RoomExists(code));
        }
        if self.fetch_record(&code).await?.is_some() {
            return Err(RoomError::RoomExists(code));
        }

        self.leave_current_room(host, &code).await;

        // Claim the live slot before writing, so two concurrent creators
        // can't both succeed. The session is spawned with the host already
        // seated, so the record never points at a session someone else
        // could join first.
        let handle = match self.rooms.entry(code.clone()) {
            Entry::Occupied(_) => return Err(RoomError::RoomExists(code)),
            Entry::Vacant(slot) => slot
                .insert(spawn_room(code.clone(), self.shared.clone(), Some(host.clone())))
                .clone(),
        };
        self.memberships.insert(host.clone(), code.clone());

        let record = RoomRecord::new(code.clone(), host.clone());
        if let Err(e) = self
            .store_call(self.shared.store.upsert_room_record(record))
            .await
        {
            tracing::warn!(room = %code, error = %e, "failed to write room record");
            self.memberships.remove_if(host, |_, room| *room == code);
            self.discard(&handle).await;
            return Err(RoomError::Unavailable(code));
        }
        tracing::info!(room = %code, host = %host, "room created");
        Ok(code)
    }

    /// Adds `user` to room `code`, reviving the session from its durable
    /// record if none is live. Joining a room one is already in is
    /// idempotent and returns the current stroke history.
    ///
    /// # Errors
    /// - [`RoomError::InvalidRoomCode`] if `code` is malformed
    /// - [`RoomError::RoomNotFound`] if no durable record exists
    /// - [`RoomError::Unavailable`] if the session can't be reached
    pub async fn join_room(&self, code: &str, user: &UserId) -> Result<JoinOutcome, RoomError> {
        let code = parse_code(code)?;
        match self.fetch_record(&code).await {
            Ok(Some(_)) => {}
            Ok(None) => return Err(RoomError::RoomNotFound(code)),
            // A live session can still take players while the store is down.
            Err(e) if self.rooms.contains_key(&code) => {
                tracing::warn!(room = %code, error = %e, "joining live room without its record");
            }
            Err(e) => return Err(e),
        }

        self.leave_current_room(user, &code).await;

        for attempt in 1..=JOIN_ATTEMPTS {
            let handle = self.live_or_revive(&code);
            match handle.join(user.clone()).await {
                Ok(outcome) => {
                    self.memberships.insert(user.clone(), code.clone());
                    return Ok(outcome);
                }
                Err(RoomError::Unavailable(_)) => {
                    // The session stopped (emptied or torn down) between
                    // lookup and send. Drop it and revive.
                    tracing::debug!(room = %code, attempt, "session gone, reviving");
                    self.forget(&handle);
                }
                Err(e) => return Err(e),
            }
        }
        Err(RoomError::Unavailable(code))
    }

    /// Removes `user` from room `code`. When the last player leaves the
    /// session stops and is dropped from the registry; the durable record
    /// stays, so the room can be rejoined later.
    pub async fn leave_room(&self, code: &str, user: &UserId) -> Result<LeaveOutcome, RoomError> {
        let code = parse_code(code)?;
        let Some(handle) = self.live(&code) else {
            self.memberships.remove_if(user, |_, room| *room == code);
            return Err(RoomError::NotInRoom(user.clone(), code));
        };

        let outcome = handle.leave(user.clone()).await;
        self.memberships.remove_if(user, |_, room| *room == code);
        match outcome {
            Ok(LeaveOutcome::Emptied) => {
                self.forget(&handle);
                tracing::info!(room = %code, "room emptied, session dropped");
                Ok(LeaveOutcome::Emptied)
            }
            Ok(LeaveOutcome::Left) => Ok(LeaveOutcome::Left),
            Err(e) => {
                if matches!(e, RoomError::Unavailable(_)) {
                    self.forget(&handle);
                }
                Err(e)
            }
        }
    }

    /// Removes `user` from whatever room they are in. Returns the room
    /// they left, if any.
    pub async fn disconnect(&self, user: &UserId) -> Option<RoomCode> {
        let code = self.player_room(user)?;
        match self.leave_room(code.as_str(), user).await {
            Ok(_) => tracing::debug!(%user, room = %code, "disconnected user removed"),
            Err(e) => tracing::debug!(%user, room = %code, error = %e, "disconnect cleanup"),
        }
        Some(code)
    }

    /// Stops room `code`'s live session and cancels its timers. The durable
    /// record is kept.
    pub async fn teardown(&self, code: &str) -> Result<(), RoomError> {
        let code = parse_code(code)?;
        let (_, handle) = self
            .rooms
            .remove(&code)
            .ok_or_else(|| RoomError::RoomNotFound(code.clone()))?;
        let _ = handle.shutdown().await;
        self.memberships.retain(|_, room| *room != code);
        tracing::info!(room = %code, "room torn down");
        Ok(())
    }

    // -- in-round events -----------------------------------------------------

    pub async fn choose_word(&self, code: &str, user: &UserId, word: &str) -> Result<(), RoomError> {
        self.handle(code)?
            .choose_word(user.clone(), word.to_owned())
            .await
    }

    pub async fn submit_stroke(&self, code: &str, user: &UserId, stroke: Stroke) -> Result<(), RoomError> {
        self.handle(code)?.submit_stroke(user.clone(), stroke).await
    }

    pub async fn clear_canvas(&self, code: &str, user: &UserId) -> Result<(), RoomError> {
        self.handle(code)?.clear_canvas(user.clone()).await
    }

    pub async fn submit_guess(&self, code: &str, user: &UserId, text: &str) -> Result<(), RoomError> {
        self.handle(code)?
            .submit_guess(user.clone(), text.to_owned())
            .await
    }

    // -- room settings -------------------------------------------------------

    /// Replaces room `code`'s word list. Only the host may. Takes effect at
    /// the next round start. Returns the number of words kept.
    pub async fn set_custom_words<I, W>(&self, code: &str, requester: &UserId, words: I) -> Result<usize, RoomError>
    where
        I: IntoIterator<Item = W>,
        W: AsRef<str>,
    {
        let code = parse_code(code)?;
        let mut record = self
            .fetch_record(&code)
            .await?
            .ok_or_else(|| RoomError::RoomNotFound(code.clone()))?;
        if record.host_id != *requester {
            return Err(RoomError::UnauthorizedAction {
                user: requester.clone(),
                action: "edit the word list",
            });
        }

        let kept = record.set_custom_words(words);
        self.store_call(self.shared.store.upsert_room_record(record))
            .await
            .map_err(|e| {
                tracing::warn!(room = %code, error = %e, "failed to save word list");
                RoomError::Unavailable(code.clone())
            })?;
        tracing::info!(room = %code, words = kept, "custom word list set");
        Ok(kept)
    }

    // -- queries -------------------------------------------------------------

    pub async fn room_info(&self, code: &str) -> Result<RoomInfo, RoomError> {
        self.handle(code)?.info().await
    }

    /// Number of live sessions.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Codes of all live sessions, sorted.
    pub fn room_codes(&self) -> Vec<RoomCode> {
        let mut codes: Vec<RoomCode> = self.rooms.iter().map(|r| r.key().clone()).collect();
        codes.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        codes
    }

    /// The room `user` is currently in.
    pub fn player_room(&self, user: &UserId) -> Option<RoomCode> {
        self.memberships.get(user).map(|room| room.value().clone())
    }

    // -- internals -----------------------------------------------------------

    fn live(&self, code: &RoomCode) -> Option<RoomHandle> {
        self.rooms.get(code).map(|h| h.value().clone())
    }

    fn handle(&self, code: &str) -> Result<RoomHandle, RoomError> {
        let code = parse_code(code)?;
        self.live(&code).ok_or(RoomError::RoomNotFound(code))
    }

    fn live_or_revive(&self, code: &RoomCode) -> RoomHandle {
        match self.rooms.entry(code.clone()) {
            Entry::Occupied(slot) => slot.get().clone(),
            Entry::Vacant(slot) => {
                tracing::info!(room = %code, "reviving room session");
                slot.insert(spawn_room(code.clone(), self.shared.clone(), None))
                    .clone()
            }
        }
    }

    /// Drops `handle`'s session from the map, unless a newer session has
    /// taken its place.
    fn forget(&self, handle: &RoomHandle) {
        self.rooms
            .remove_if(handle.code(), |_, live| live.session_id() == handle.session_id());
    }

    async fn discard(&self, handle: &RoomHandle) {
        self.forget(handle);
        let _ = handle.shutdown().await;
    }

    /// Leaves the user's current room if it is not `next`.
    async fn leave_current_room(&self, user: &UserId, next: &RoomCode) {
        match self.player_room(user) {
            Some(current) if current != *next => {
                tracing::debug!(%user, from = %current, to = %next, "switching rooms");
                let _ = self.leave_room(current.as_str(), user).await;
            }
            _ => {}
        }
    }

    async fn fetch_record(&self, code: &RoomCode) -> Result<Option<RoomRecord>, RoomError> {
        self.store_call(self.shared.store.get_room_record(code))
            .await
            .map_err(|e| {
                tracing::warn!(room = %code, error = %e, "failed to read room record");
                RoomError::Unavailable(code.clone())
            })
    }

    /// Runs a store call under the configured timeout.
    async fn store_call<T>(&self, fut: impl Future<Output = Result<T, StoreError>>) -> Result<T, StoreError> {
        time::timeout(self.shared.config.store_timeout, fut)
            .await
            .map_err(|_| StoreError::Unavailable("timed out".to_owned()))?
    }
}

fn parse_code(raw: &str) -> Result<RoomCode, RoomError> {
    RoomCode::parse(raw).map_err(|_| RoomError::InvalidRoomCode(raw.to_owned()))
}
