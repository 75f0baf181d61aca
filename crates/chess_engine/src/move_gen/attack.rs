//! Attack detection and square checking
//!
//! Provides functions to check if squares are under attack and if kings are in check.
//! This module is critical for move legality validation, check detection and
//! castling safety.
//!
//! ## Algorithm
//!
//! To check if a square is attacked, we iterate through the attacker's pieces
//! and test whether each one's capture pattern reaches the target square:
//!
//! - Pawns attack the two diagonal squares in front of them, occupied or not
//! - Knights and kings attack their fixed offsets
//! - Sliders attack along their rays up to and including the first blocker
//!
//! Pawn pushes and castling never capture, so they are not attacks. That keeps
//! this module independent of the king's castling generator, which itself
//! asks whether squares are attacked.

use crate::board::Board;
use crate::constants::*;
use crate::types::*;

/// Check if a square is under attack by pieces of the specified color
///
/// # Arguments
///
/// * `board` - The current position
/// * `square` - Target square to check
/// * `by_color` - Color of pieces that might attack
///
/// # Examples
///
/// ```rust,ignore
/// // Check if e4 is attacked by black pieces
/// let attacked = is_square_attacked(&board, "e4".parse()?, Color::Black);
/// ```
pub fn is_square_attacked(board: &Board, square: Square, by_color: Color) -> bool {
    board.pieces(by_color).any(|(from, piece)| match piece.kind {
        PieceKind::Pawn => can_pawn_attack(from, square, by_color),
        PieceKind::Knight => can_leap_to(from, square, &KNIGHT_OFFSETS),
        PieceKind::Bishop => can_slide_to(board, from, square, &BISHOP_DIRS),
        PieceKind::Rook => can_slide_to(board, from, square, &ROOK_DIRS),
        PieceKind::Queen => can_slide_to(board, from, square, &QUEEN_DIRS),
        PieceKind::King => can_leap_to(from, square, &KING_OFFSETS),
    })
}

/// Check if the king of a color is in check
///
/// A side without a king is never in check; such positions cannot be
/// reached through the public API.
pub fn is_in_check(board: &Board, color: Color) -> bool {
    board
        .king_square(color)
        .is_some_and(|king| is_square_attacked(board, king, color.opposite()))
}

fn can_pawn_attack(from: Square, to: Square, color: Color) -> bool {
    to.rank() - from.rank() == color.pawn_direction() && (to.file() - from.file()).abs() == 1
}

fn can_leap_to(from: Square, to: Square, offsets: &[(i8, i8)]) -> bool {
    offsets
        .iter()
        .any(|&(df, dr)| from.offset(df, dr) == Some(to))
}

fn can_slide_to(board: &Board, from: Square, to: Square, directions: &[(i8, i8)]) -> bool {
    let df = to.file() - from.file();
    let dr = to.rank() - from.rank();
    if df == 0 && dr == 0 {
        return false;
    }
    // Target must lie on a straight or diagonal line from the piece
    if df != 0 && dr != 0 && df.abs() != dr.abs() {
        return false;
    }

    let dir = (df.signum(), dr.signum());
    if !directions.contains(&dir) {
        return false;
    }

    ray_reaches(board, from, to, dir)
}

/// Walk a ray from `from` until it meets `to` or any other piece
fn ray_reaches(board: &Board, from: Square, to: Square, (df, dr): (i8, i8)) -> bool {
    let mut current = from;
    while let Some(next) = current.offset(df, dr) {
        if next == to {
            return true;
        }
        if !board.is_empty(next) {
            return false;
        }
        current = next;
    }
    false
}
