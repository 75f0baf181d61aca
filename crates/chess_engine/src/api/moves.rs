//! Move execution and validation

use super::Game;
use crate::error::{ChessEngineError, ChessEngineResult};
use crate::make_unmake::make_move;
use crate::move_gen;
use crate::types::*;

impl Game {
    /// All legal moves of the side to move
    pub fn legal_moves(&self) -> Vec<Move> {
        move_gen::legal_moves(&self.board, self.board.side_to_move())
    }

    /// All legal moves `color` would have if it were on move
    pub fn legal_moves_for(&self, color: Color) -> Vec<Move> {
        move_gen::legal_moves(&self.board, color)
    }

    /// Legal moves of the piece on `from`
    ///
    /// Empty when the square is empty or holds a piece of the side not on move.
    pub fn moves_from(&self, from: Square) -> Vec<Move> {
        self.legal_moves()
            .into_iter()
            .filter(|mv| mv.from == from)
            .collect()
    }

    /// Check whether moving from `from` to `to` is legal for the side to move
    pub fn is_legal(&self, from: Square, to: Square) -> bool {
        self.find_legal(from, to).is_some()
    }

    /// Apply a move for the side to move
    ///
    /// The move is matched against the legal move set on `from` and `to`
    /// only; any promotion the caller asked for is ignored and the generated
    /// move (always promoting to a queen) is applied and returned.
    ///
    /// # Errors
    ///
    /// [`ChessEngineError::IllegalMove`] when no legal move matches. The game
    /// is left untouched in that case.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let mut game = Game::new();
    /// game.apply_move(Move::new("e2".parse()?, "e4".parse()?))?;
    /// assert_eq!(game.side_to_move(), Color::Black);
    /// ```
    pub fn apply_move(&mut self, mv: Move) -> ChessEngineResult<Move> {
        let Some(legal) = self.find_legal(mv.from, mv.to) else {
            return Err(ChessEngineError::IllegalMove {
                from: mv.from,
                to: mv.to,
            });
        };

        self.history.push(self.board.clone());
        make_move(&mut self.board, legal);
        Ok(legal)
    }

    /// Take back the most recent move
    ///
    /// Returns `false` when there is nothing to undo.
    pub fn undo_move(&mut self) -> bool {
        match self.history.pop() {
            Some(previous) => {
                self.board = previous;
                true
            }
            None => false,
        }
    }

    fn find_legal(&self, from: Square, to: Square) -> Option<Move> {
        // Only the piece on `from` needs generating and filtering
        let piece = self.board.piece_at(from)?;
        if piece.color != self.board.side_to_move() {
            return None;
        }
        move_gen::pseudo_moves(&self.board, from)
            .into_iter()
            .filter(|mv| mv.to == to)
            .find(|mv| {
                let mut scratch = self.board.clone();
                make_move(&mut scratch, *mv);
                !move_gen::is_in_check(&scratch, piece.color)
            })
    }
}
