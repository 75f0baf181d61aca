//! Game lifecycle management
//!
//! Creating, loading and resetting games.

use crate::board::Board;
use crate::error::ParseError;
use crate::fen::{format_fen, parse_fen};
use crate::types::Color;

/// A position plus the positions that preceded it
///
/// `history` holds one snapshot per applied move, oldest first. Undo pops the
/// most recent snapshot back into `board`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Game {
    pub(super) board: Board,
    pub(super) history: Vec<Board>,
}

impl Game {
    /// Create a new game with initial position
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a position from FEN, with an empty history
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let game = Game::from_fen("4k3/8/8/8/8/8/8/4K2R w K - 0 1")?;
    /// assert_eq!(game.side_to_move(), Color::White);
    /// ```
    pub fn from_fen(fen: &str) -> Result<Self, ParseError> {
        Ok(Self::from_board(parse_fen(fen)?))
    }

    pub fn from_board(board: Board) -> Self {
        Game {
            board,
            history: Vec::new(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Current position as FEN
    pub fn fen(&self) -> String {
        format_fen(&self.board)
    }

    pub fn side_to_move(&self) -> Color {
        self.board.side_to_move()
    }

    /// Number of moves applied since the game was created
    pub fn ply(&self) -> usize {
        self.history.len()
    }

    /// Reset the game to starting position and drop the history
    pub fn reset(&mut self) {
        self.board = Board::default();
        self.history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::STARTING_FEN;

    #[test]
    fn test_new_game_is_starting_position() {
        let game = Game::new();
        assert_eq!(game.fen(), STARTING_FEN);
        assert_eq!(game.ply(), 0);
    }

    #[test]
    fn test_reset_clears_history() {
        let mut game = Game::from_fen("4k3/8/8/8/8/8/8/4K2R w K - 7 30").unwrap();
        game.history.push(game.board.clone());
        game.reset();
        assert_eq!(game.fen(), STARTING_FEN);
        assert_eq!(game.ply(), 0);
    }

    #[test]
    fn test_from_fen_rejects_invalid_record() {
        assert!(Game::from_fen("not a fen").is_err());
    }
}
