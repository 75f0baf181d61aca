use super::*;
use std::time::Duration;
use tokio::time::timeout;

fn pid(name: &str) -> PlayerId {
    PlayerId::new(name).unwrap()
}

fn sq(name: &str) -> Square {
    name.parse().unwrap()
}

fn settings() -> GameSettings {
    GameSettings {
        match_timeout: Duration::from_secs(30),
        synthetic_move_delay: Duration::from_secs(2),
        points_per_win: 100,
        session_idle_timeout: Duration::from_secs(600),
        sweep_interval: Duration::from_secs(60),
    }
}

fn server(seed: u64) -> (GameServerHandle, UnboundedReceiver<GameFinished>) {
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let handle = GameServer::spawn_with_rng(settings(), events_tx, StdRng::seed_from_u64(seed));
    (handle, events_rx)
}

/// Wait for the next message, failing after a short virtual delay
async fn next(conn: &mut Connection) -> ServerMessage {
    timeout(Duration::from_millis(500), conn.recv())
        .await
        .expect("expected a message")
        .expect("server stopped")
}

/// Let queued commands run without moving the clock far
async fn settle() {
    tokio::time::sleep(Duration::from_millis(10)).await;
}

fn assigned(msg: ServerMessage) -> Color {
    match msg {
        ServerMessage::ColorAssigned { color } => color,
        other => panic!("expected colorAssigned, got {other:?}"),
    }
}

/// Pair two humans, returning (white, black)
async fn paired(handle: &GameServerHandle) -> (Connection, Connection) {
    let mut alice = handle.connect(pid("alice")).await.unwrap();
    let mut bob = handle.connect(pid("bob")).await.unwrap();
    alice.send(ClientMessage::Join).unwrap();
    bob.send(ClientMessage::Join).unwrap();

    let alice_color = assigned(next(&mut alice).await);
    let bob_color = assigned(next(&mut bob).await);
    assert_eq!(alice_color.opposite(), bob_color);

    if alice_color == Color::White {
        (alice, bob)
    } else {
        (bob, alice)
    }
}

fn play(conn: &Connection, from: &str, to: &str) {
    conn.send(ClientMessage::Move {
        from: sq(from),
        to: sq(to),
    })
    .unwrap();
}

// ============================================================================
// Connection Tests
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_second_connection_is_refused() {
    let (handle, _events) = server(1);
    let _first = handle.connect(pid("alice")).await.unwrap();

    let err = handle.connect(pid("alice")).await.err().unwrap();
    assert_eq!(err, ServerError::AlreadyConnected(pid("alice")));
}

#[tokio::test(start_paused = true)]
async fn test_reconnect_after_drop() {
    let (handle, _events) = server(1);
    let first = handle.connect(pid("alice")).await.unwrap();
    drop(first);

    assert!(handle.connect(pid("alice")).await.is_ok());
}

// ============================================================================
// Matchmaking Tests
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_two_players_pair_with_complementary_colors() {
    let (handle, _events) = server(2);
    let (_white, _black) = paired(&handle).await;
}

#[tokio::test(start_paused = true)]
async fn test_lone_player_gets_synthetic_after_timeout() {
    let (handle, _events) = server(3);
    let mut alice = handle.connect(pid("alice")).await.unwrap();
    alice.send(ClientMessage::Join).unwrap();

    tokio::time::sleep(Duration::from_secs(29)).await;
    assert!(alice.try_recv().is_none());

    tokio::time::sleep(Duration::from_secs(2)).await;
    let color = assigned(next(&mut alice).await);

    // A later human does not join that session
    let mut bob = handle.connect(pid("bob")).await.unwrap();
    bob.send(ClientMessage::Join).unwrap();
    settle().await;
    assert!(bob.try_recv().is_none());

    if color == Color::Black {
        match next_after_delay(&mut alice).await {
            ServerMessage::Move { .. } => {}
            other => panic!("expected synthetic opening move, got {other:?}"),
        }
    }
}

async fn next_after_delay(conn: &mut Connection) -> ServerMessage {
    timeout(Duration::from_secs(3), conn.recv())
        .await
        .expect("expected a message")
        .expect("server stopped")
}

#[tokio::test(start_paused = true)]
async fn test_request_synthetic_short_circuits_and_is_idempotent() {
    let (handle, _events) = server(4);
    let mut alice = handle.connect(pid("alice")).await.unwrap();
    alice.send(ClientMessage::Join).unwrap();
    alice.send(ClientMessage::RequestSyntheticOpponent).unwrap();
    assigned(next(&mut alice).await);

    alice.send(ClientMessage::RequestSyntheticOpponent).unwrap();
    settle().await;
    assert!(
        !matches!(alice.try_recv(), Some(ServerMessage::ColorAssigned { .. })),
        "second request must not start another game"
    );

    // The cancelled match timeout never fires a second assignment
    tokio::time::sleep(Duration::from_secs(40)).await;
    while let Some(msg) = alice.try_recv() {
        assert!(!matches!(msg, ServerMessage::ColorAssigned { .. }));
    }
}

#[tokio::test(start_paused = true)]
async fn test_join_while_playing_is_rejected() {
    let (handle, _events) = server(5);
    let (mut white, _black) = paired(&handle).await;

    white.send(ClientMessage::Join).unwrap();
    match next(&mut white).await {
        ServerMessage::Rejected { reason } => {
            assert_eq!(reason, ServerError::AlreadyInSession.to_string())
        }
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_waiting_player_leaving_frees_the_slot() {
    let (handle, _events) = server(6);
    let alice = handle.connect(pid("alice")).await.unwrap();
    alice.send(ClientMessage::Join).unwrap();
    settle().await;
    drop(alice);

    let mut bob = handle.connect(pid("bob")).await.unwrap();
    bob.send(ClientMessage::Join).unwrap();
    settle().await;
    assert!(bob.try_recv().is_none(), "bob must wait, not pair with alice");

    // Alice's old timeout is stale; bob's own fires at 30s after his join
    tokio::time::sleep(Duration::from_secs(31)).await;
    assigned(next(&mut bob).await);
}

// ============================================================================
// Relay Tests
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_move_is_relayed_to_opponent_only() {
    let (handle, _events) = server(7);
    let (mut white, mut black) = paired(&handle).await;

    play(&white, "e2", "e4");
    assert_eq!(
        next(&mut black).await,
        ServerMessage::Move {
            from: sq("e2"),
            to: sq("e4"),
            promotion: None
        }
    );
    settle().await;
    assert!(white.try_recv().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_out_of_turn_and_illegal_moves_are_rejected() {
    let (handle, _events) = server(8);
    let (mut white, mut black) = paired(&handle).await;

    play(&black, "e7", "e5");
    assert!(matches!(next(&mut black).await, ServerMessage::Rejected { .. }));

    play(&white, "e2", "e5");
    assert!(matches!(next(&mut white).await, ServerMessage::Rejected { .. }));

    // Still white's turn, and the game goes on
    play(&white, "e2", "e4");
    assert!(matches!(next(&mut black).await, ServerMessage::Move { .. }));
}

#[tokio::test(start_paused = true)]
async fn test_move_without_session_is_rejected() {
    let (handle, _events) = server(9);
    let mut alice = handle.connect(pid("alice")).await.unwrap();
    play(&alice, "e2", "e4");
    match next(&mut alice).await {
        ServerMessage::Rejected { reason } => {
            assert_eq!(reason, ServerError::NotInSession.to_string())
        }
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_checkmate_finishes_and_publishes_once() {
    let (handle, mut events) = server(10);
    let (mut white, mut black) = paired(&handle).await;
    let white_id = white.player().clone();
    let black_id = black.player().clone();

    play(&white, "f2", "f3");
    next(&mut black).await;
    play(&black, "e7", "e5");
    next(&mut white).await;
    play(&white, "g2", "g4");
    next(&mut black).await;
    play(&black, "d8", "h4");

    assert!(matches!(next(&mut white).await, ServerMessage::Move { .. }));
    let finished = ServerMessage::GameFinished {
        winner: Some(Color::Black),
    };
    assert_eq!(next(&mut white).await, finished);
    assert_eq!(next(&mut black).await, finished);

    let mut received = vec![events.recv().await.unwrap(), events.recv().await.unwrap()];
    received.sort_by_key(|e| e.points);
    assert_eq!(received[0].player, white_id);
    assert_eq!(received[0].points, 0);
    assert_eq!(received[1].player, black_id);
    assert_eq!(received[1].points, 100);
    settle().await;
    assert!(events.try_recv().is_err());

    // The session is gone; both may queue again
    play(&white, "e2", "e4");
    assert!(matches!(next(&mut white).await, ServerMessage::Rejected { .. }));
    white.send(ClientMessage::Join).unwrap();
    black.send(ClientMessage::Join).unwrap();
    assigned(next(&mut white).await);
    assigned(next(&mut black).await);
}

#[tokio::test(start_paused = true)]
async fn test_opponent_left_notifies_and_frees_remaining_player() {
    let (handle, _events) = server(11);
    let (white, mut black) = paired(&handle).await;
    drop(white);

    assert_eq!(next(&mut black).await, ServerMessage::OpponentLeft);

    // Remaining player can queue again
    black.send(ClientMessage::Join).unwrap();
    let mut carol = handle.connect(pid("carol")).await.unwrap();
    carol.send(ClientMessage::Join).unwrap();
    assigned(next(&mut black).await);
    assigned(next(&mut carol).await);
}

// ============================================================================
// Synthetic Opponent Tests
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_synthetic_replies_after_delay() {
    let (handle, _events) = server(12);
    let mut alice = handle.connect(pid("alice")).await.unwrap();
    alice.send(ClientMessage::RequestSyntheticOpponent).unwrap();
    let color = assigned(next(&mut alice).await);

    if color == Color::Black {
        // Synthetic white opens
        tokio::time::sleep(Duration::from_millis(1900)).await;
        assert!(alice.try_recv().is_none());
        assert!(matches!(next(&mut alice).await, ServerMessage::Move { .. }));
        play(&alice, "e7", "e5");
    } else {
        play(&alice, "e2", "e4");
    }

    settle().await;
    assert!(alice.try_recv().is_none(), "reply must wait for the delay");
    tokio::time::sleep(Duration::from_secs(2)).await;
    assert!(matches!(alice.try_recv(), Some(ServerMessage::Move { .. })));
}

#[tokio::test(start_paused = true)]
async fn test_synthetic_game_abandoned_stops_timer() {
    let (handle, mut events) = server(13);
    let mut alice = handle.connect(pid("alice")).await.unwrap();
    alice.send(ClientMessage::RequestSyntheticOpponent).unwrap();
    assigned(next(&mut alice).await);
    drop(alice);

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert!(events.try_recv().is_err());
    // Identity is free again
    assert!(handle.connect(pid("alice")).await.is_ok());
}

// ============================================================================
// Eviction Tests
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_idle_session_expires() {
    let (handle, _events) = server(14);
    let (mut white, mut black) = paired(&handle).await;

    tokio::time::sleep(Duration::from_secs(700)).await;
    assert_eq!(white.try_recv(), Some(ServerMessage::SessionExpired));
    assert_eq!(black.try_recv(), Some(ServerMessage::SessionExpired));

    play(&white, "e2", "e4");
    assert!(matches!(next(&mut white).await, ServerMessage::Rejected { .. }));
}

#[tokio::test(start_paused = true)]
async fn test_active_session_is_not_expired() {
    let (handle, _events) = server(15);
    let (white, mut black) = paired(&handle).await;

    tokio::time::sleep(Duration::from_secs(500)).await;
    play(&white, "e2", "e4");
    assert!(matches!(next(&mut black).await, ServerMessage::Move { .. }));

    tokio::time::sleep(Duration::from_secs(500)).await;
    assert!(black.try_recv().is_none());
}
