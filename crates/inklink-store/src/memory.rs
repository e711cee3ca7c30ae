//! In-process [`Store`] implementation.
//!
//! Everything lives in one `RwLock`-guarded struct. Lock hold times are a
//! few map operations, never an `.await`, so a single lock is plenty for a
//! single node.

use std::collections::HashMap;

use inklink_protocol::{RoomCode, UserId};
use tokio::sync::RwLock;

use crate::{RoomRecord, Store, StoreError, UserRecord};

#[derive(Debug, Default)]
struct Inner {
    rooms: HashMap<RoomCode, RoomRecord>,
    users: HashMap<UserId, UserRecord>,
    /// Lower-cased username → owner. Kept in sync with `users`.
    usernames: HashMap<String, UserId>,
}

/// A [`Store`] that keeps every record in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of room records held.
    pub async fn room_count(&self) -> usize {
        self.inner.read().await.rooms.len()
    }

    /// Removes a room record, as an external inactivity TTL would.
    pub async fn expire_room(&self, code: &RoomCode) -> Option<RoomRecord> {
        self.inner.write().await.rooms.remove(code)
    }
}

impl Store for MemoryStore {
    async fn get_room_record(&self, code: &RoomCode) -> Result<Option<RoomRecord>, StoreError> {
        Ok(self.inner.read().await.rooms.get(code).cloned())
    }

    async fn upsert_room_record(&self, record: RoomRecord) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        tracing::debug!(room = %record.room_id, source = ?record.word_list_source, "room record upserted");
        inner.rooms.insert(record.room_id.clone(), record);
        Ok(())
    }

    async fn get_user(&self, id: &UserId) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.inner.read().await.users.get(id).cloned())
    }

    async fn upsert_user_xp(&self, id: &UserId, delta: u32) -> Result<UserRecord, StoreError> {
        let mut inner = self.inner.write().await;
        let user = inner
            .users
            .get_mut(id)
            .ok_or_else(|| StoreError::UserNotFound(id.clone()))?;
        if let Some(level) = user.apply_award(delta) {
            tracing::info!(user = %id, level, "user levelled up");
        }
        Ok(user.clone())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<UserRecord>, StoreError> {
        let key = username.trim().to_lowercase();
        let inner = self.inner.read().await;
        Ok(inner
            .usernames
            .get(&key)
            .and_then(|owner| inner.users.get(owner))
            .cloned())
    }

    async fn register_username(&self, id: &UserId, username: &str) -> Result<UserRecord, StoreError> {
        let key = username.trim().to_lowercase();
        if key.is_empty() {
            return Err(StoreError::InvalidUsername);
        }

        let mut inner = self.inner.write().await;
        if let Some(owner) = inner.usernames.get(&key) {
            if owner != id {
                return Err(StoreError::UsernameTaken(key));
            }
        }

        // Renaming keeps XP, level, and cosmetics.
        let previous = inner.users.get(id).map(|u| u.username.clone());
        if let Some(old) = previous {
            inner.usernames.remove(&old);
        }
        let record = match inner.users.remove(id) {
            Some(mut existing) => {
                existing.username = key.clone();
                existing
            }
            None => UserRecord::new(id.clone(), &key),
        };
        inner.usernames.insert(key, id.clone());
        inner.users.insert(id.clone(), record.clone());
        tracing::info!(user = %id, username = %record.username, "username registered");
        Ok(record)
    }
}
