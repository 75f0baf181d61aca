//! King move generation
//!
//! Handles king-specific move generation. Kings move one square in any direction
//! (horizontally, vertically, or diagonally), plus castling.
//!
//! ## Castling
//!
//! A castle is offered only when all of the following hold:
//! - The matching castling right is still held
//! - The king stands on its home square and the rook on its corner
//! - Every square between king and rook is empty
//! - None of the king's start, transit and destination squares is attacked
//!
//! The b-file square of a queen-side castle must be empty but may be attacked.

use super::attack::is_square_attacked;
use crate::board::Board;
use crate::constants::*;
use crate::types::*;

/// Generate king moves from a given square
pub fn generate_king_moves(board: &Board, from: Square, color: Color, moves: &mut Vec<Move>) {
    for (df, dr) in KING_OFFSETS {
        if let Some(to) = from.offset(df, dr) {
            if !board.is_occupied_by(to, color) {
                moves.push(Move::new(from, to));
            }
        }
    }

    generate_castling_moves(board, from, color, moves);
}

fn generate_castling_moves(board: &Board, from: Square, color: Color, moves: &mut Vec<Move>) {
    if Board::king_home(color) != Some(from) {
        return;
    }

    for side in [CastleSide::KingSide, CastleSide::QueenSide] {
        if !board.castling_rights().has(color, side) {
            continue;
        }

        let (rook_file, king_to_file) = match side {
            CastleSide::KingSide => (ROOK_START_FILES.1, CASTLE_KING_FILES.1),
            CastleSide::QueenSide => (ROOK_START_FILES.0, CASTLE_KING_FILES.0),
        };

        let own_rook = Board::back_rank_square(color, rook_file).and_then(|sq| board.piece_at(sq));
        if own_rook != Some(Piece::new(color, PieceKind::Rook)) {
            continue;
        }

        let step = (rook_file - KING_START_FILE).signum();

        let path_clear = files_between(KING_START_FILE, rook_file)
            .filter_map(|file| Board::back_rank_square(color, file))
            .all(|sq| board.is_empty(sq));
        if !path_clear {
            continue;
        }

        let enemy = color.opposite();
        let mut king_path = (0..=2).map(|i| KING_START_FILE + i * step);
        let path_safe = king_path.all(|file| {
            Board::back_rank_square(color, file)
                .is_some_and(|sq| !is_square_attacked(board, sq, enemy))
        });
        if !path_safe {
            continue;
        }

        if let Some(to) = Board::back_rank_square(color, king_to_file) {
            moves.push(Move::new(from, to));
        }
    }
}

/// Files strictly between two files
fn files_between(a: i8, b: i8) -> impl Iterator<Item = i8> {
    let (lo, hi) = if a < b { (a, b) } else { (b, a) };
    (lo + 1)..hi
}
