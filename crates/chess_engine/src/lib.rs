//! # Chess Engine
//!
//! Rules of standard chess on an 8x8 board: FEN parsing and formatting,
//! pseudo-legal and legal move generation (castling, en passant, promotion to
//! a queen), check, checkmate and stalemate detection, plus an undo stack.
//!
//! The engine has no clock, no search and no I/O. It is a plain value type
//! the game server owns one of per session.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use chess_engine::{Game, GameStatus, Move};
//!
//! let mut game = Game::new();
//! game.apply_move(Move::from_uci("f2f3")?)?;
//! game.apply_move(Move::from_uci("e7e5")?)?;
//! game.apply_move(Move::from_uci("g2g4")?)?;
//! game.apply_move(Move::from_uci("d8h4")?)?;
//! assert_eq!(game.status(), GameStatus::Checkmate);
//! ```
//!
//! ## Module Organization
//!
//! - [`types`] - colors, pieces, squares, moves, castling rights
//! - [`board`] - position state
//! - [`fen`] - FEN parsing and formatting
//! - [`move_gen`] - pseudo-legal and legal move generation, attack detection
//! - [`api`] - the [`Game`] state machine
//! - [`bot`] - random capture-preferring move choice

pub mod api;
pub mod board;
pub mod bot;
pub mod constants;
pub mod error;
pub mod fen;
mod make_unmake;
pub mod move_gen;
pub mod types;

pub use api::{Game, GameStatus};
pub use board::Board;
pub use bot::choose_move;
pub use constants::STARTING_FEN;
pub use error::{ChessEngineError, ChessEngineResult, ParseError};
pub use fen::{format_fen, parse_fen};
pub use types::{CastleSide, CastlingRights, Color, Move, Piece, PieceKind, Square};
