//! Pawn move generation
//!
//! Handles pawn-specific move generation including:
//! - Single and double forward pushes
//! - Diagonal captures
//! - En passant
//! - Promotion (always to a queen)
//!
//! ## Pawn Movement Rules
//!
//! - **Forward push**: Pawns move one square forward (toward opponent)
//! - **Double push**: From the starting rank (rank 2 for white, rank 7 for black),
//!   pawns can move two squares forward if both squares are empty
//! - **Captures**: Pawns capture diagonally forward (one square)
//! - **En passant**: Capture onto the tracked en-passant target, removing the
//!   pawn that just double-pushed past it
//! - **Promotion**: A pawn reaching the last rank becomes a queen. No other
//!   promotion piece is generated.

use crate::board::Board;
use crate::types::*;

/// Generate pawn moves from a given square
///
/// # Arguments
///
/// * `board` - The current position
/// * `from` - Square holding the pawn
/// * `color` - Color of the pawn
/// * `moves` - Output vector to append valid moves to
pub fn generate_pawn_moves(board: &Board, from: Square, color: Color, moves: &mut Vec<Move>) {
    let dir = color.pawn_direction();
    let start_rank = match color {
        Color::White => 1,
        Color::Black => 6,
    };

    // Forward pushes
    if let Some(one) = from.offset(0, dir) {
        if board.is_empty(one) {
            push_pawn_move(from, one, color, moves);

            if from.rank() == start_rank {
                if let Some(two) = one.offset(0, dir) {
                    if board.is_empty(two) {
                        moves.push(Move::new(from, two));
                    }
                }
            }
        }
    }

    // Diagonal captures, including en passant
    for df in [-1, 1] {
        let Some(to) = from.offset(df, dir) else {
            continue;
        };

        if board.is_occupied_by(to, color.opposite()) {
            push_pawn_move(from, to, color, moves);
        } else if board.en_passant_target() == Some(to) && is_en_passant_victim(board, to, color) {
            moves.push(Move::new(from, to));
        }
    }
}

/// Square of the pawn removed by an en-passant capture landing on `target`
pub(crate) fn en_passant_victim_square(target: Square, mover: Color) -> Option<Square> {
    target.offset(0, -mover.pawn_direction())
}

fn is_en_passant_victim(board: &Board, target: Square, mover: Color) -> bool {
    let victim = Piece::new(mover.opposite(), PieceKind::Pawn);
    en_passant_victim_square(target, mover)
        .and_then(|sq| board.piece_at(sq))
        .is_some_and(|p| p == victim)
}

fn push_pawn_move(from: Square, to: Square, color: Color, moves: &mut Vec<Move>) {
    let last_rank = match color {
        Color::White => 7,
        Color::Black => 0,
    };

    if to.rank() == last_rank {
        moves.push(Move::with_promotion(from, to, PieceKind::Queen));
    } else {
        moves.push(Move::new(from, to));
    }
}
