//! Game state queries
//!
//! A game ends when the side to move has no legal move: checkmate if its king
//! is attacked, stalemate otherwise. Draws by repetition, the fifty-move rule
//! or insufficient material are not detected.

use serde::{Deserialize, Serialize};

use super::Game;
use crate::move_gen;
use crate::types::Color;

/// Outcome of the current position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GameStatus {
    InProgress,
    Checkmate,
    Stalemate,
}

impl Game {
    /// Get current game state (in progress, checkmate, stalemate)
    pub fn status(&self) -> GameStatus {
        if !self.legal_moves().is_empty() {
            GameStatus::InProgress
        } else if self.in_check() {
            GameStatus::Checkmate
        } else {
            GameStatus::Stalemate
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status() != GameStatus::InProgress
    }

    /// Winner of a finished game, `None` while in progress or after stalemate
    pub fn winner(&self) -> Option<Color> {
        match self.status() {
            GameStatus::Checkmate => Some(self.side_to_move().opposite()),
            _ => None,
        }
    }

    /// Whether the side to move is in check
    pub fn in_check(&self) -> bool {
        move_gen::is_in_check(&self.board, self.side_to_move())
    }
}
