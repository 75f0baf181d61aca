//! Rook move generation
//!
//! Rooks slide any distance along ranks and files. Castling is generated
//! by the king, not here.

use super::sliding::generate_sliding_moves;
use crate::board::Board;
use crate::constants::ROOK_DIRS;
use crate::types::*;

/// Generate rook moves from a given square
pub fn generate_rook_moves(board: &Board, from: Square, color: Color, moves: &mut Vec<Move>) {
    generate_sliding_moves(board, from, color, &ROOK_DIRS, moves);
}
