//! Backend API Integration Tests
//!
//! Tests for the Axum HTTP endpoints using Router::oneshot pattern.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use backend::api::{self, AppState};
use backend::ledger::{GameFinished, GameResult, MemoryLedger, PointsLedger, SqliteLedger};
use backend::session::SessionId;
use backend::{GameServer, GameServerHandle, GameSettings, PlayerId};
use serde_json::{json, Value};
use sqlx::sqlite::SqlitePoolOptions;
use tokio::sync::mpsc;
use tower::ServiceExt;

fn pid(name: &str) -> PlayerId {
    PlayerId::new(name).unwrap()
}

fn test_server() -> GameServerHandle {
    let (events_tx, _events_rx) = mpsc::unbounded_channel();
    GameServer::spawn(GameSettings::default(), events_tx)
}

/// Helper to create test router over an in-memory ledger
fn test_router(ledger: Arc<MemoryLedger>) -> (Router, GameServerHandle) {
    let server = test_server();
    let state = AppState {
        server: server.clone(),
        ledger,
    };
    (api::router(state), server)
}

async fn get(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body.to_vec())
}

#[tokio::test]
async fn test_health() {
    let (app, _server) = test_router(Arc::new(MemoryLedger::new()));
    let (status, body) = get(app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"ok");
}

#[tokio::test]
async fn test_points_for_unknown_player_is_zero() {
    let (app, _server) = test_router(Arc::new(MemoryLedger::new()));
    let (status, body) = get(app, "/players/alice/points").await;
    assert_eq!(status, StatusCode::OK);

    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body, json!({ "player": "alice", "points": 0 }));
}

#[tokio::test]
async fn test_points_reflect_awards() {
    let ledger = Arc::new(MemoryLedger::new());
    ledger.award_points(&pid("alice"), 100).await.unwrap();
    ledger.award_points(&pid("alice"), 100).await.unwrap();

    let (app, _server) = test_router(ledger);
    let (_, body) = get(app, "/players/alice/points").await;
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["points"], 200);
}

#[tokio::test]
async fn test_points_from_sqlite_ledger() {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");
    let ledger = Arc::new(SqliteLedger::from_pool(pool).await.unwrap());
    ledger.award_points(&pid("bob"), 100).await.unwrap();

    let app = api::router(AppState {
        server: test_server(),
        ledger,
    });
    let (status, body) = get(app, "/players/bob/points").await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body, json!({ "player": "bob", "points": 100 }));
}

#[tokio::test]
async fn test_games_lists_history() {
    let ledger = Arc::new(MemoryLedger::new());
    let session = SessionId::new();
    ledger
        .record_game(&GameFinished {
            session,
            player: pid("alice"),
            result: GameResult::Win,
            points: 100,
        })
        .await
        .unwrap();

    let (app, _server) = test_router(ledger);
    let (status, body) = get(app.clone(), "/players/alice/games").await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(
        body,
        json!({
            "player": "alice",
            "games": [{ "session": session.to_string(), "result": "win", "points": 100 }]
        })
    );

    let (_, body) = get(app, "/players/bob/games").await;
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["games"], json!([]));
}

#[tokio::test]
async fn test_ws_requires_player_identity() {
    let (app, _server) = test_router(Arc::new(MemoryLedger::new()));
    let (status, _) = get(app.clone(), "/ws").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get(app, "/ws?player=%20%20").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_ws_refuses_banned_player() {
    let ledger = Arc::new(MemoryLedger::new());
    ledger.ban(&pid("mallory"));

    let (app, server) = test_router(ledger);
    let (status, _) = get(app, "/ws?player=mallory").await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // The refused player was never registered
    assert!(server.connect(pid("mallory")).await.is_ok());
}

#[tokio::test]
async fn test_ws_refuses_second_connection() {
    let (app, server) = test_router(Arc::new(MemoryLedger::new()));
    let _alice = server.connect(pid("alice")).await.unwrap();

    let (status, body) = get(app, "/ws?player=alice").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(String::from_utf8_lossy(&body).contains("already connected"));
}

#[tokio::test]
async fn test_ws_without_upgrade_releases_identity() {
    let (app, server) = test_router(Arc::new(MemoryLedger::new()));

    // A plain GET is not a websocket handshake
    let (status, _) = get(app, "/ws?player=alice").await;
    assert!(status.is_client_error());
    assert_ne!(status, StatusCode::CONFLICT);

    assert!(server.connect(pid("alice")).await.is_ok());
}
