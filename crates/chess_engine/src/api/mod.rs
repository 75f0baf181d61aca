//! Public API for the chess engine
//!
//! [`Game`] wraps a [`Board`](crate::board::Board) with a history of prior
//! positions, so every applied move can be taken back. It is the only type a
//! caller needs to play a game through: create it, ask it for legal moves,
//! apply moves, query the outcome.
//!
//! ## Module Organization
//!
//! - `game` - Game lifecycle (new, from_fen, reset)
//! - `moves` - Move execution and validation (apply_move, undo_move, is_legal)
//! - `state` - Game state queries (status, winner, in_check)

mod game;
mod moves;
mod state;

pub use game::Game;
pub use state::GameStatus;
