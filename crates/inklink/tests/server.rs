//! Integration tests for the server router: commands in, events out.

use std::sync::Arc;
use std::time::Duration;

use inklink::prelude::*;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time;

// =========================================================================
// Harness
// =========================================================================

struct Harness {
    server: GameServer<MemoryStore, ChannelBroadcaster>,
    broadcaster: Arc<ChannelBroadcaster>,
}

fn harness() -> Harness {
    let broadcaster = Arc::new(ChannelBroadcaster::new());
    let server = GameServerBuilder::new()
        .catalog(WordCatalog::new([WordEntry::new("tree", 2)]))
        .build(Arc::new(MemoryStore::new()), Arc::clone(&broadcaster));
    Harness {
        server,
        broadcaster,
    }
}

fn uid(id: &str) -> UserId {
    UserId::from(id)
}

fn create(room: &str) -> ClientCommand {
    ClientCommand::CreateRoom {
        room_id: room.into(),
    }
}

fn join(room: &str) -> ClientCommand {
    ClientCommand::JoinRoom {
        room_id: room.into(),
    }
}

async fn recv_until(
    rx: &mut UnboundedReceiver<ServerEvent>,
    pred: impl Fn(&ServerEvent) -> bool,
) -> ServerEvent {
    loop {
        let event = time::timeout(Duration::from_secs(600), rx.recv())
            .await
            .expect("timed out waiting for event")
            .expect("connection closed");
        if pred(&event) {
            return event;
        }
    }
}

fn room_error(rx: &mut UnboundedReceiver<ServerEvent>) -> Option<String> {
    while let Ok(event) = rx.try_recv() {
        if let ServerEvent::RoomError { kind, .. } = event {
            return Some(kind);
        }
    }
    None
}

// =========================================================================
// Rooms
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_create_room_acknowledges_then_starts_round() {
    let h = harness();
    let mut rx = h.broadcaster.connect(&uid("u1"));

    h.server.dispatch(&uid("u1"), create("AB12")).await.unwrap();

    let ack = recv_until(&mut rx, |e| matches!(e, ServerEvent::RoomCreated { .. })).await;
    assert_eq!(ack, ServerEvent::RoomCreated { room_id: "AB12".into() });
    let info = h.server.registry().room_info("AB12").await.unwrap();
    assert_eq!(info.drawer, Some(uid("u1")));
}

#[tokio::test(start_paused = true)]
async fn test_rejections_reach_the_sender_only() {
    let h = harness();
    let mut rx1 = h.broadcaster.connect(&uid("u1"));
    let mut rx2 = h.broadcaster.connect(&uid("u2"));

    let err = h.server.dispatch(&uid("u1"), create("ab12")).await.unwrap_err();
    assert_eq!(err.kind(), "invalid-room-code");
    assert_eq!(room_error(&mut rx1).as_deref(), Some("invalid-room-code"));

    let err = h.server.dispatch(&uid("u1"), join("NOPE1")).await.unwrap_err();
    assert_eq!(err.kind(), "room-not-found");
    assert_eq!(room_error(&mut rx1).as_deref(), Some("room-not-found"));

    h.server.dispatch(&uid("u1"), create("AB12")).await.unwrap();
    h.server.dispatch(&uid("u2"), join("AB12")).await.unwrap();
    let err = h
        .server
        .dispatch(
            &uid("u2"),
            ClientCommand::ChooseWord {
                room_id: "AB12".into(),
                word: "tree".into(),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "unauthorized-action");
    assert_eq!(room_error(&mut rx2).as_deref(), Some("unauthorized-action"));
    assert_eq!(room_error(&mut rx1), None);
}

#[tokio::test(start_paused = true)]
async fn test_join_acknowledges_and_announces() {
    let h = harness();
    let mut rx1 = h.broadcaster.connect(&uid("u1"));
    let mut rx2 = h.broadcaster.connect(&uid("u2"));
    h.server.dispatch(&uid("u1"), create("AB12")).await.unwrap();
    h.server.dispatch(&uid("u2"), join("AB12")).await.unwrap();

    let joined = recv_until(&mut rx1, |e| matches!(e, ServerEvent::PlayerJoined { .. })).await;
    assert_eq!(
        joined,
        ServerEvent::PlayerJoined {
            user_id: uid("u2"),
            username: "u2".into(),
        }
    );
    let ack = recv_until(&mut rx2, |e| matches!(e, ServerEvent::RoomJoined { .. })).await;
    assert_eq!(ack, ServerEvent::RoomJoined { room_id: "AB12".into() });
}

#[tokio::test(start_paused = true)]
async fn test_full_round_through_frames() {
    let h = harness();
    let mut rx1 = h.broadcaster.connect(&uid("u1"));
    let _rx2 = h.broadcaster.connect(&uid("u2"));
    h.server
        .dispatch(
            &uid("u2"),
            ClientCommand::RegisterUsername {
                username: "Bob".into(),
            },
        )
        .await
        .unwrap();

    let frames: [(&str, &str); 4] = [
        ("u1", r#"{"event":"create-room","payload":{"roomId":"AB12"}}"#),
        ("u2", r#"{"event":"join-room","payload":{"roomId":"AB12"}}"#),
        ("u1", r#"{"event":"choose-word","payload":{"roomId":"AB12","word":"tree"}}"#),
        ("u2", r#"{"event":"guess","payload":{"roomId":"AB12","text":"Tree"}}"#),
    ];
    for (user, frame) in frames {
        h.server.dispatch_frame(&uid(user), frame.as_bytes()).await.unwrap();
    }

    let guess = recv_until(&mut rx1, |e| matches!(e, ServerEvent::CorrectGuess { .. })).await;
    assert_eq!(
        guess,
        ServerEvent::CorrectGuess {
            guesser_name: "bob".into(),
            xp: 100,
            word: "tree".into(),
        }
    );
}

#[tokio::test(start_paused = true)]
async fn test_garbage_frame_is_reported() {
    let h = harness();
    let mut rx = h.broadcaster.connect(&uid("u1"));

    let err = h
        .server
        .dispatch_frame(&uid("u1"), b"{\"event\":\"dance\"}")
        .await
        .unwrap_err();
    assert!(matches!(err, InklinkError::Protocol(_)));
    assert_eq!(room_error(&mut rx).as_deref(), Some("invalid-message"));
}

#[tokio::test(start_paused = true)]
async fn test_disconnect_removes_user_from_room() {
    let h = harness();
    h.server.dispatch(&uid("u1"), create("AB12")).await.unwrap();
    h.server.dispatch(&uid("u2"), join("AB12")).await.unwrap();

    h.server.disconnect(&uid("u2")).await;
    let info = h.server.registry().room_info("AB12").await.unwrap();
    assert_eq!(info.players, vec![uid("u1")]);

    h.server.disconnect(&uid("u1")).await;
    assert_eq!(h.server.registry().room_count(), 0);
}

// =========================================================================
// Profiles
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_username_check_and_register() {
    let h = harness();
    let mut rx1 = h.broadcaster.connect(&uid("u1"));
    let mut rx2 = h.broadcaster.connect(&uid("u2"));
    let check = |name: &str| ClientCommand::CheckUsername {
        username: name.into(),
    };

    h.server.dispatch(&uid("u1"), check("Ann")).await.unwrap();
    assert_eq!(
        rx1.try_recv().unwrap(),
        ServerEvent::UsernameStatus {
            username: "ann".into(),
            available: true,
        }
    );

    h.server
        .dispatch(
            &uid("u1"),
            ClientCommand::RegisterUsername {
                username: "Ann".into(),
            },
        )
        .await
        .unwrap();
    assert_eq!(
        rx1.try_recv().unwrap(),
        ServerEvent::UsernameRegistered {
            username: "ann".into(),
        }
    );

    h.server.dispatch(&uid("u2"), check("ANN")).await.unwrap();
    assert_eq!(
        rx2.try_recv().unwrap(),
        ServerEvent::UsernameStatus {
            username: "ann".into(),
            available: false,
        }
    );

    let err = h
        .server
        .dispatch(
            &uid("u2"),
            ClientCommand::RegisterUsername {
                username: "ann".into(),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "username-taken");
    assert_eq!(room_error(&mut rx2).as_deref(), Some("username-taken"));
}

#[tokio::test(start_paused = true)]
async fn test_blank_username_is_unavailable() {
    let h = harness();
    let mut rx = h.broadcaster.connect(&uid("u1"));
    h.server
        .dispatch(
            &uid("u1"),
            ClientCommand::CheckUsername {
                username: "   ".into(),
            },
        )
        .await
        .unwrap();
    assert!(matches!(
        rx.try_recv().unwrap(),
        ServerEvent::UsernameStatus { available: false, .. }
    ));
}

#[tokio::test(start_paused = true)]
async fn test_get_score_defaults_for_unknown_user() {
    let h = harness();
    let mut rx = h.broadcaster.connect(&uid("u1"));
    h.server.dispatch(&uid("u1"), ClientCommand::GetScore).await.unwrap();
    assert_eq!(rx.try_recv().unwrap(), ServerEvent::UserScore { xp: 0, level: 1 });
}

#[test]
fn test_encode_uses_wire_shape() {
    let h = harness();
    let bytes = h.server.encode(&ServerEvent::Clear).unwrap();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json, serde_json::json!({ "event": "clear" }));
}
