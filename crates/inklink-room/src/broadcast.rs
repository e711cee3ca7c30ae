//! The outbound seam: how room sessions reach connected users.
//!
//! Rooms never own connections. They resolve a [`Recipient`] to member ids
//! and hand each event to a [`Broadcaster`], which the transport layer
//! implements on top of its own user → connection registry.
//!
//! [`Recipient`]: inklink_protocol::Recipient

use dashmap::DashMap;
use inklink_protocol::{RoomCode, ServerEvent, UserId};
use tokio::sync::mpsc;

/// Delivers events to users.
///
/// Both methods are synchronous and must not block: room sessions call
/// them from inside their event loop. Delivery is best-effort; a user with
/// no live connection simply misses the event.
pub trait Broadcaster: Send + Sync + 'static {
    /// Delivers `event` to one user.
    fn send_to_user(&self, user: &UserId, event: &ServerEvent);

    /// Delivers `event` to the listed members of `room`.
    ///
    /// The default sends to each member in turn. Transports with native
    /// room channels can override it.
    fn broadcast_to_room(&self, room: &RoomCode, members: &[UserId], event: &ServerEvent) {
        tracing::trace!(%room, event = event.name(), members = members.len(), "broadcast");
        for member in members {
            self.send_to_user(member, event);
        }
    }
}

/// A [`Broadcaster`] backed by one unbounded channel per connected user.
///
/// The transport calls [`connect`](Self::connect) when a user's socket
/// opens and forwards whatever arrives on the returned receiver. It is also
/// what the tests use to observe exactly which events each user saw.
#[derive(Debug, Default)]
pub struct ChannelBroadcaster {
    connections: DashMap<UserId, mpsc::UnboundedSender<ServerEvent>>,
}

impl ChannelBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a connection for `user`, replacing any previous one.
    pub fn connect(&self, user: &UserId) -> mpsc::UnboundedReceiver<ServerEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        if self.connections.insert(user.clone(), tx).is_some() {
            tracing::debug!(%user, "connection replaced");
        }
        rx
    }

    /// Drops `user`'s connection. Returns `true` if one was registered.
    pub fn disconnect(&self, user: &UserId) -> bool {
        self.connections.remove(user).is_some()
    }

    pub fn is_connected(&self, user: &UserId) -> bool {
        self.connections
            .get(user)
            .is_some_and(|tx| !tx.is_closed())
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }
}

impl Broadcaster for ChannelBroadcaster {
    fn send_to_user(&self, user: &UserId, event: &ServerEvent) {
        let delivered = match self.connections.get(user) {
            Some(tx) => tx.send(event.clone()).is_ok(),
            None => {
                tracing::trace!(%user, event = event.name(), "no connection, event dropped");
                return;
            }
        };
        // The shard guard from `get` is released by now.
        if !delivered {
            self.connections.remove_if(user, |_, tx| tx.is_closed());
            tracing::debug!(%user, "receiver gone, connection removed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_to_connected_user() {
        let broadcaster = ChannelBroadcaster::new();
        let user = UserId::from("u1");
        let mut rx = broadcaster.connect(&user);

        broadcaster.send_to_user(&user, &ServerEvent::Clear);
        assert_eq!(rx.try_recv().unwrap(), ServerEvent::Clear);
    }

    #[test]
    fn test_send_to_unknown_user_is_dropped() {
        let broadcaster = ChannelBroadcaster::new();
        broadcaster.send_to_user(&UserId::from("ghost"), &ServerEvent::Clear);
        assert_eq!(broadcaster.connection_count(), 0);
    }

    #[test]
    fn test_broadcast_reaches_listed_members_only() {
        let broadcaster = ChannelBroadcaster::new();
        let (a, b, c) = (UserId::from("a"), UserId::from("b"), UserId::from("c"));
        let mut rx_a = broadcaster.connect(&a);
        let mut rx_b = broadcaster.connect(&b);
        let mut rx_c = broadcaster.connect(&c);
        let room = RoomCode::parse("AB12").unwrap();

        broadcaster.broadcast_to_room(&room, &[a, b], &ServerEvent::Clear);

        assert!(rx_a.try_recv().is_ok());
        assert!(rx_b.try_recv().is_ok());
        assert!(rx_c.try_recv().is_err());
    }

    #[test]
    fn test_dead_receiver_is_pruned() {
        let broadcaster = ChannelBroadcaster::new();
        let user = UserId::from("u1");
        drop(broadcaster.connect(&user));
        assert!(!broadcaster.is_connected(&user));

        broadcaster.send_to_user(&user, &ServerEvent::Clear);
        assert_eq!(broadcaster.connection_count(), 0);
    }

    #[test]
    fn test_reconnect_replaces_channel() {
        let broadcaster = ChannelBroadcaster::new();
        let user = UserId::from("u1");
        let mut old = broadcaster.connect(&user);
        let mut new = broadcaster.connect(&user);

        broadcaster.send_to_user(&user, &ServerEvent::Clear);
        assert!(new.try_recv().is_ok());
        assert!(old.try_recv().is_err());
        assert_eq!(broadcaster.connection_count(), 1);
    }
}
