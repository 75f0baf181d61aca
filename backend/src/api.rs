//! HTTP surface
//!
//! - `GET /ws?player=<id>` - websocket for one player (see [`crate::socket`])
//! - `GET /players/{id}/points` - current points balance
//! - `GET /players/{id}/games` - finished games, oldest first
//! - `GET /health` - liveness probe
//!
//! The websocket route refuses the upgrade with `400` when the identity is
//! missing or blank, `403` when the ledger reports the player banned and
//! `409` when the player already has a live connection.

use std::sync::Arc;

use axum::{
    extract::ws::{rejection::WebSocketUpgradeRejection, WebSocketUpgrade},
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::error::ServerError;
use crate::game::GameServerHandle;
use crate::ledger::{GameRecord, PointsLedger};
use crate::session::PlayerId;
use crate::socket;

#[derive(Clone)]
pub struct AppState {
    pub server: GameServerHandle,
    pub ledger: Arc<dyn PointsLedger>,
}

#[derive(Deserialize)]
pub struct ConnectParams {
    pub player: Option<String>,
}

#[derive(Serialize)]
pub struct PointsResponse {
    pub player: PlayerId,
    pub points: i64,
}

#[derive(Serialize)]
pub struct GamesResponse {
    pub player: PlayerId,
    pub games: Vec<GameRecord>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ws", get(ws_handler))
        .route("/players/{id}/points", get(player_points))
        .route("/players/{id}/games", get(player_games))
        .route("/health", get(health))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn ws_handler(
    State(state): State<AppState>,
    Query(params): Query<ConnectParams>,
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Response {
    let Some(player) = params.player.and_then(PlayerId::new) else {
        return (StatusCode::BAD_REQUEST, "Missing player identity").into_response();
    };

    match state.ledger.is_banned(&player).await {
        Ok(false) => {}
        Ok(true) => {
            warn!("[SOCKET] Refused banned player {}", player);
            return (StatusCode::FORBIDDEN, "Player is banned").into_response();
        }
        Err(e) => {
            error!("[SOCKET] Ban check failed for {}: {}", player, e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Database error").into_response();
        }
    }

    let connection = match state.server.connect(player).await {
        Ok(connection) => connection,
        Err(e @ ServerError::AlreadyConnected(_)) => {
            return (StatusCode::CONFLICT, e.to_string()).into_response();
        }
        Err(e) => {
            error!("[SOCKET] Could not register connection: {}", e);
            return (StatusCode::SERVICE_UNAVAILABLE, e.to_string()).into_response();
        }
    };

    // A failed upgrade drops the connection, which unregisters the player
    let ws = match ws {
        Ok(ws) => ws,
        Err(rejection) => return rejection.into_response(),
    };

    info!("[SOCKET] Upgrading websocket for {}", connection.player());
    ws.on_upgrade(move |socket| socket::serve_socket(socket, connection))
}

async fn player_points(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PointsResponse>, (StatusCode, &'static str)> {
    let player = PlayerId::new(id).ok_or((StatusCode::BAD_REQUEST, "Missing player identity"))?;
    let points = state.ledger.points(&player).await.map_err(|e| {
        error!("[LEDGER] Points lookup failed for {}: {}", player, e);
        (StatusCode::INTERNAL_SERVER_ERROR, "Database error")
    })?;
    Ok(Json(PointsResponse { player, points }))
}

async fn player_games(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<GamesResponse>, (StatusCode, &'static str)> {
    let player = PlayerId::new(id).ok_or((StatusCode::BAD_REQUEST, "Missing player identity"))?;
    let games = state.ledger.games(&player).await.map_err(|e| {
        error!("[LEDGER] History lookup failed for {}: {}", player, e);
        (StatusCode::INTERNAL_SERVER_ERROR, "Database error")
    })?;
    Ok(Json(GamesResponse { player, games }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_params_player_is_optional() {
        let params: ConnectParams = serde_json::from_str("{}").unwrap();
        assert!(params.player.is_none());
    }

    #[test]
    fn test_points_response_serialization() {
        let response = PointsResponse {
            player: PlayerId::new("alice").unwrap(),
            points: 300,
        };
        let json = serde_json::to_string(&response).expect("Should serialize");
        assert_eq!(json, r#"{"player":"alice","points":300}"#);
    }
}
