//! Command routing: every inbound command from a connected user enters
//! here and is sent to the registry or the store.
//!
//! A rejected command is reported to its sender as `room-error` and also
//! returned, so the transport can log it. Nothing here ever fails the
//! connection.

use std::future::Future;

use inklink_protocol::{ClientCommand, Codec, ServerEvent, UserId};
use inklink_room::Broadcaster;
use inklink_store::{Store, StoreError};
use tokio::time;

use crate::{GameServer, InklinkError};

impl<S: Store, B: Broadcaster, C: Codec> GameServer<S, B, C> {
    /// Routes one command from `user`.
    pub async fn dispatch(&self, user: &UserId, cmd: ClientCommand) -> Result<(), InklinkError> {
        let name = command_name(&cmd);
        let result = self.route(user, cmd).await;
        if let Err(e) = &result {
            tracing::debug!(%user, command = name, kind = e.kind(), error = %e, "command rejected");
            self.reply(
                user,
                ServerEvent::RoomError {
                    kind: e.kind().to_owned(),
                    message: e.to_string(),
                },
            );
        }
        result
    }

    /// Decodes a raw frame with the server's codec, then routes it.
    pub async fn dispatch_frame(&self, user: &UserId, frame: &[u8]) -> Result<(), InklinkError> {
        match self.codec.decode::<ClientCommand>(frame) {
            Ok(cmd) => self.dispatch(user, cmd).await,
            Err(e) => {
                let err = InklinkError::from(e);
                tracing::debug!(%user, error = %err, "undecodable frame");
                self.reply(
                    user,
                    ServerEvent::RoomError {
                        kind: err.kind().to_owned(),
                        message: err.to_string(),
                    },
                );
                Err(err)
            }
        }
    }

    /// The user's connection is gone: remove them from their room.
    pub async fn disconnect(&self, user: &UserId) {
        if let Some(room) = self.registry.disconnect(user).await {
            tracing::info!(%user, %room, "user disconnected");
        }
    }

    async fn route(&self, user: &UserId, cmd: ClientCommand) -> Result<(), InklinkError> {
        let registry = &self.registry;
        match cmd {
            ClientCommand::CreateRoom { room_id } => {
                let code = registry.create_room(&room_id, user).await?;
                self.reply(user, ServerEvent::RoomCreated { room_id: code.to_string() });
            }
            ClientCommand::JoinRoom { room_id } => {
                let outcome = registry.join_room(&room_id, user).await?;
                self.reply(user, ServerEvent::RoomJoined { room_id: outcome.room.to_string() });
            }
            ClientCommand::LeaveRoom { room_id } => {
                registry.leave_room(&room_id, user).await?;
            }
            ClientCommand::ChooseWord { room_id, word } => {
                registry.choose_word(&room_id, user, &word).await?;
            }
            ClientCommand::Stroke { room_id, stroke } => {
                registry.submit_stroke(&room_id, user, stroke).await?;
            }
            ClientCommand::ClearCanvas { room_id } => {
                registry.clear_canvas(&room_id, user).await?;
            }
            ClientCommand::Guess { room_id, text } => {
                registry.submit_guess(&room_id, user, &text).await?;
            }
            ClientCommand::CheckUsername { username } => {
                let username = username.trim().to_lowercase();
                let available = if username.is_empty() {
                    false
                } else {
                    let store = registry.store();
                    self.bounded(store.find_user_by_username(&username))
                        .await?
                        .is_none_or(|owner| owner.user_id == *user)
                };
                self.reply(user, ServerEvent::UsernameStatus { username, available });
            }
            ClientCommand::RegisterUsername { username } => {
                let store = registry.store();
                let record = self.bounded(store.register_username(user, &username)).await?;
                self.reply(
                    user,
                    ServerEvent::UsernameRegistered {
                        username: record.username,
                    },
                );
            }
            ClientCommand::GetScore => {
                let store = registry.store();
                let (xp, level) = self
                    .bounded(store.get_user(user))
                    .await?
                    .map_or((0, 1), |record| (record.xp, record.level));
                self.reply(user, ServerEvent::UserScore { xp, level });
            }
        }
        Ok(())
    }

    fn reply(&self, user: &UserId, event: ServerEvent) {
        self.registry.broadcaster().send_to_user(user, &event);
    }

    /// Runs a store call under the configured store timeout.
    async fn bounded<T>(&self, fut: impl Future<Output = Result<T, StoreError>>) -> Result<T, StoreError> {
        time::timeout(self.registry.config().store_timeout, fut)
            .await
            .map_err(|_| StoreError::Unavailable("timed out".to_owned()))?
    }
}

fn command_name(cmd: &ClientCommand) -> &'static str {
    match cmd {
        ClientCommand::CreateRoom { .. } => "create-room",
        ClientCommand::JoinRoom { .. } => "join-room",
        ClientCommand::LeaveRoom { .. } => "leave-room",
        ClientCommand::ChooseWord { .. } => "choose-word",
        ClientCommand::Stroke { .. } => "stroke",
        ClientCommand::ClearCanvas { .. } => "clear-canvas",
        ClientCommand::Guess { .. } => "guess",
        ClientCommand::CheckUsername { .. } => "check-username",
        ClientCommand::RegisterUsername { .. } => "register-username",
        ClientCommand::GetScore => "get-score",
    }
}
