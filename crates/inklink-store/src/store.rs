//! The durable-store contract.
//!
//! Inklink doesn't own a database. It defines the [`Store`] trait and the
//! room core calls it; a deployment plugs in whatever backs it (a document
//! store, SQL, or [`MemoryStore`](crate::MemoryStore) for tests).

use std::future::Future;

use inklink_protocol::{RoomCode, UserId};

use crate::{RoomRecord, StoreError, UserRecord};

/// Reads and writes the records the room core depends on.
///
/// `Send + Sync + 'static` because one store is shared by every room task.
/// Every returned future is `Send` so room tasks can await it on any
/// worker thread.
///
/// # Example
///
/// ```rust
/// use inklink_protocol::{RoomCode, UserId};
/// use inklink_store::{MemoryStore, RoomRecord, Store};
///
/// # tokio_test_block(async {
/// let store = MemoryStore::new();
/// let code = RoomCode::parse("AB12").unwrap();
/// store.upsert_room_record(RoomRecord::new(code.clone(), UserId::from("host"))).await.unwrap();
/// assert!(store.get_room_record(&code).await.unwrap().is_some());
/// # });
/// # fn tokio_test_block(f: impl std::future::Future<Output = ()>) {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
/// # }
/// ```
pub trait Store: Send + Sync + 'static {
    /// Looks up a room's durable record.
    fn get_room_record(
        &self,
        code: &RoomCode,
    ) -> impl Future<Output = Result<Option<RoomRecord>, StoreError>> + Send;

    /// Inserts or replaces a room's durable record.
    fn upsert_room_record(
        &self,
        record: RoomRecord,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Looks up a user's profile.
    fn get_user(
        &self,
        id: &UserId,
    ) -> impl Future<Output = Result<Option<UserRecord>, StoreError>> + Send;

    /// Applies one correct-guess award of `delta` XP and returns the
    /// updated profile.
    ///
    /// # Errors
    /// [`StoreError::UserNotFound`] if the user never registered.
    fn upsert_user_xp(
        &self,
        id: &UserId,
        delta: u32,
    ) -> impl Future<Output = Result<UserRecord, StoreError>> + Send;

    /// Finds a user by username, case-insensitively.
    fn find_user_by_username(
        &self,
        username: &str,
    ) -> impl Future<Output = Result<Option<UserRecord>, StoreError>> + Send;

    /// Registers (or renames) a user under a unique username.
    ///
    /// # Errors
    /// [`StoreError::UsernameTaken`] if another user holds it,
    /// [`StoreError::InvalidUsername`] if it is blank.
    fn register_username(
        &self,
        id: &UserId,
        username: &str,
    ) -> impl Future<Output = Result<UserRecord, StoreError>> + Send;
}
