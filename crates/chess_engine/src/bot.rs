//! Random opponent
//!
//! The synthetic player plays the first legal capture in generation order
//! when one exists, otherwise a uniformly random legal move. A capture here
//! means a move onto a square held by the opponent, so en passant counts as a
//! quiet move.

use rand::Rng;
use rand::seq::IndexedRandom;

use crate::board::Board;
use crate::types::Move;

/// Pick a move for the side to move from its legal moves
///
/// Returns `None` when `legal` is empty.
///
/// # Examples
///
/// ```rust,ignore
/// let game = Game::new();
/// let mv = choose_move(game.board(), &game.legal_moves(), &mut rand::rng());
/// ```
pub fn choose_move<R: Rng + ?Sized>(board: &Board, legal: &[Move], rng: &mut R) -> Option<Move> {
    let opponent = board.side_to_move().opposite();
    legal
        .iter()
        .find(|mv| board.is_occupied_by(mv.to, opponent))
        .or_else(|| legal.choose(rng))
        .copied()
}
