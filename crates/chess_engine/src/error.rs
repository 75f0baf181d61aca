//! Error types for chess engine
//!
//! Provides custom error types for position parsing and move validation.
//! Every error is local to the call that produced it: a failed parse or a
//! rejected move never leaves an engine value half-modified.

use thiserror::Error;

use crate::types::{Color, Square};

/// Errors produced while reading a FEN record, a square or a move string
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// FEN must carry exactly six space-separated fields
    #[error("Expected 6 FEN fields, found {0}")]
    FieldCount(usize),

    /// Piece placement must describe 8 ranks
    #[error("Expected 8 ranks in piece placement, found {0}")]
    RankCount(usize),

    /// A rank did not add up to 8 files
    #[error("Rank {rank} describes {width} files (must be 8)")]
    RankWidth { rank: u8, width: usize },

    /// Unknown character in piece placement
    #[error("Invalid piece character '{0}'")]
    InvalidPiece(char),

    /// Side to move must be `w` or `b`
    #[error("Invalid side to move '{0}'")]
    InvalidSideToMove(String),

    /// Castling field must be `-` or a subset of `KQkq`
    #[error("Invalid castling rights '{0}'")]
    InvalidCastling(String),

    /// En-passant target must be `-` or a square on rank 3 or 6
    #[error("Invalid en-passant target '{0}'")]
    InvalidEnPassant(String),

    /// Half-move clock or full-move number is not a valid counter
    #[error("Invalid {field} '{value}'")]
    InvalidCounter { field: &'static str, value: String },

    /// Each side needs exactly one king
    #[error("Expected exactly one {color} king, found {count}")]
    KingCount { color: Color, count: usize },

    /// The side that just moved left its own king attacked
    #[error("{color} king is in check while {color} is not to move")]
    KingCapturable { color: Color },

    /// Not an algebraic square name
    #[error("Invalid square '{0}'")]
    InvalidSquare(String),

    /// Not a long-algebraic move
    #[error("Invalid move notation '{0}'")]
    InvalidMove(String),
}

/// Errors that can occur in the chess engine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChessEngineError {
    /// Position record could not be read
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Move is not in the legal move set of the side to move
    #[error("Illegal move: from square {from} to square {to}")]
    IllegalMove { from: Square, to: Square },
}

/// Result type alias for chess engine operations
pub type ChessEngineResult<T> = Result<T, ChessEngineError>;
