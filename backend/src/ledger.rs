//! Points and ban store
//!
//! The game server never talks to storage directly. It publishes one
//! [`GameFinished`] event per human participant of a finished game; a ledger
//! task consumes them, records every game in the player's history and
//! credits winners through a [`PointsLedger`]. The same ledger answers ban
//! checks at connect time and point and history queries over HTTP.
//!
//! ## Implementations
//!
//! - [`SqliteLedger`] - `players(id, points, is_banned)` and
//!   `games(session, player, result, points, finished_at)` tables via sqlx
//! - [`MemoryLedger`] - in-process map, used in tests and when no
//!   `DATABASE_URL` is configured

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::Serialize;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::error::LedgerError;
use crate::session::{PlayerId, SessionId};

/// How a finished game went for one participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GameResult {
    Win,
    Loss,
    Draw,
}

impl GameResult {
    pub fn as_str(self) -> &'static str {
        match self {
            GameResult::Win => "win",
            GameResult::Loss => "loss",
            GameResult::Draw => "draw",
        }
    }
}

impl FromStr for GameResult {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "win" => Ok(GameResult::Win),
            "loss" => Ok(GameResult::Loss),
            "draw" => Ok(GameResult::Draw),
            other => Err(LedgerError::InvalidRecord(format!("unknown game result '{other}'"))),
        }
    }
}

/// Outcome of a finished session for one human participant
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameFinished {
    pub session: SessionId,
    pub player: PlayerId,
    pub result: GameResult,
    pub points: u32,
}

/// One stored game of a player's history
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameRecord {
    pub session: String,
    pub result: GameResult,
    pub points: u32,
}

impl From<&GameFinished> for GameRecord {
    fn from(game: &GameFinished) -> Self {
        GameRecord {
            session: game.session.to_string(),
            result: game.result,
            points: game.points,
        }
    }
}

/// Storage of player points, game history and ban status
#[async_trait]
pub trait PointsLedger: Send + Sync {
    /// Append a finished game to the player's history
    async fn record_game(&self, game: &GameFinished) -> Result<(), LedgerError>;

    /// A player's finished games, oldest first
    async fn games(&self, player: &PlayerId) -> Result<Vec<GameRecord>, LedgerError>;

    /// Add `amount` to a player's balance, creating the player if needed
    async fn award_points(&self, player: &PlayerId, amount: u32) -> Result<(), LedgerError>;

    /// Current balance; unknown players have zero
    async fn points(&self, player: &PlayerId) -> Result<i64, LedgerError>;

    /// Whether a player may not join; unknown players are not banned
    async fn is_banned(&self, player: &PlayerId) -> Result<bool, LedgerError>;
}

/// Record and credit every finished-game event until the channel closes
///
/// Store failures are logged and the event is dropped; they never reach the
/// game server.
pub fn spawn_ledger_task(
    ledger: Arc<dyn PointsLedger>,
    mut events: UnboundedReceiver<GameFinished>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            if let Err(e) = ledger.record_game(&event).await {
                error!(
                    "[LEDGER] Failed to record session {} for {}: {}",
                    event.session, event.player, e
                );
            }
            if event.points == 0 {
                debug!(
                    "[LEDGER] {} finished session {} with {:?}, nothing to award",
                    event.player, event.session, event.result
                );
                continue;
            }
            match ledger.award_points(&event.player, event.points).await {
                Ok(()) => info!(
                    "[LEDGER] Awarded {} points to {} for session {}",
                    event.points, event.player, event.session
                ),
                Err(e) => error!(
                    "[LEDGER] Failed to award {} points to {}: {}",
                    event.points, event.player, e
                ),
            }
        }
        debug!("[LEDGER] Event channel closed");
    })
}

// ============================================================================
// SQLite
// ============================================================================

/// Ledger backed by a SQLite database
#[derive(Debug, Clone)]
pub struct SqliteLedger {
    pool: Pool<Sqlite>,
}

impl SqliteLedger {
    /// Open (or create) the database at `url` and ensure the schema exists
    pub async fn connect(url: &str) -> Result<Self, LedgerError> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;
        Self::from_pool(pool).await
    }

    /// Use an existing pool, creating the schema if needed
    pub async fn from_pool(pool: Pool<Sqlite>) -> Result<Self, LedgerError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS players (
                id TEXT PRIMARY KEY,
                points INTEGER NOT NULL DEFAULT 0,
                is_banned INTEGER NOT NULL DEFAULT 0
            );",
        )
        .execute(&pool)
        .await?;
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS games (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                session TEXT NOT NULL,
                player TEXT NOT NULL,
                result TEXT NOT NULL,
                points INTEGER NOT NULL DEFAULT 0,
                finished_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );",
        )
        .execute(&pool)
        .await?;
        Ok(SqliteLedger { pool })
    }

    /// Set or clear a player's ban flag
    pub async fn set_banned(&self, player: &PlayerId, banned: bool) -> Result<(), LedgerError> {
        sqlx::query(
            "INSERT INTO players (id, is_banned) VALUES (?1, ?2)
             ON CONFLICT(id) DO UPDATE SET is_banned = excluded.is_banned",
        )
        .bind(player.as_str())
        .bind(banned)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl PointsLedger for SqliteLedger {
    async fn record_game(&self, game: &GameFinished) -> Result<(), LedgerError> {
        sqlx::query("INSERT INTO games (session, player, result, points) VALUES (?1, ?2, ?3, ?4)")
            .bind(game.session.to_string())
            .bind(game.player.as_str())
            .bind(game.result.as_str())
            .bind(i64::from(game.points))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn games(&self, player: &PlayerId) -> Result<Vec<GameRecord>, LedgerError> {
        let rows: Vec<(String, String, i64)> = sqlx::query_as(
            "SELECT session, result, points FROM games WHERE player = ?1 ORDER BY id",
        )
        .bind(player.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|(session, result, points)| -> Result<GameRecord, LedgerError> {
                Ok(GameRecord {
                    session,
                    result: result.parse()?,
                    points: u32::try_from(points).map_err(|_| {
                        LedgerError::InvalidRecord(format!("negative points {points}"))
                    })?,
                })
            })
            .collect()
    }

    async fn award_points(&self, player: &PlayerId, amount: u32) -> Result<(), LedgerError> {
        sqlx::query(
            "INSERT INTO players (id, points) VALUES (?1, ?2)
             ON CONFLICT(id) DO UPDATE SET points = points + excluded.points",
        )
        .bind(player.as_str())
        .bind(i64::from(amount))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn points(&self, player: &PlayerId) -> Result<i64, LedgerError> {
        let points: Option<i64> = sqlx::query_scalar("SELECT points FROM players WHERE id = ?1")
            .bind(player.as_str())
            .fetch_optional(&self.pool)
            .await?;
        Ok(points.unwrap_or(0))
    }

    async fn is_banned(&self, player: &PlayerId) -> Result<bool, LedgerError> {
        let banned: Option<bool> = sqlx::query_scalar("SELECT is_banned FROM players WHERE id = ?1")
            .bind(player.as_str())
            .fetch_optional(&self.pool)
            .await?;
        Ok(banned.unwrap_or(false))
    }
}

// ============================================================================
// In-memory
// ============================================================================

#[derive(Debug, Clone, Default)]
struct PlayerRecord {
    points: i64,
    banned: bool,
    games: Vec<GameRecord>,
}

/// Ledger kept in process memory
#[derive(Debug, Default)]
pub struct MemoryLedger {
    players: RwLock<HashMap<PlayerId, PlayerRecord>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ban(&self, player: &PlayerId) {
        self.players.write().entry(player.clone()).or_default().banned = true;
    }
}

#[async_trait]
impl PointsLedger for MemoryLedger {
    async fn record_game(&self, game: &GameFinished) -> Result<(), LedgerError> {
        self.players
            .write()
            .entry(game.player.clone())
            .or_default()
            .games
            .push(GameRecord::from(game));
        Ok(())
    }

    async fn games(&self, player: &PlayerId) -> Result<Vec<GameRecord>, LedgerError> {
        Ok(self
            .players
            .read()
            .get(player)
            .map(|r| r.games.clone())
            .unwrap_or_default())
    }

    async fn award_points(&self, player: &PlayerId, amount: u32) -> Result<(), LedgerError> {
        self.players.write().entry(player.clone()).or_default().points += i64::from(amount);
        Ok(())
    }

    async fn points(&self, player: &PlayerId) -> Result<i64, LedgerError> {
        Ok(self.players.read().get(player).map_or(0, |r| r.points))
    }

    async fn is_banned(&self, player: &PlayerId) -> Result<bool, LedgerError> {
        Ok(self.players.read().get(player).is_some_and(|r| r.banned))
    }
}
