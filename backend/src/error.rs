//! Error types for the game server
//!
//! Every [`ServerError`] is a local rejection of one client request: the
//! server reports it to the sender as a `rejected` message and no session
//! state changes.

use chess_engine::Square;
use thiserror::Error;

use crate::session::PlayerId;

/// Rejections of client requests
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServerError {
    /// Move submitted while the opponent is on move
    #[error("Not your turn")]
    InvalidTurn,

    /// Move submitted before the session started or after it ended
    #[error("Session is not active")]
    SessionNotActive,

    /// Move submitted by a player without a session
    #[error("Not in a session")]
    NotInSession,

    /// Move absent from the legal move set
    #[error("Illegal move: from square {from} to square {to}")]
    IllegalMove { from: Square, to: Square },

    /// Join while already playing
    #[error("Already in an active session")]
    AlreadyInSession,

    /// Second connection for the same identity
    #[error("Player {0} is already connected")]
    AlreadyConnected(PlayerId),

    /// The game server task has stopped
    #[error("Game server is not running")]
    Unavailable,
}

/// Errors from the points and ban store
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored row could not be read back
    #[error("Invalid stored record: {0}")]
    InvalidRecord(String),
}

/// Invalid environment configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}
