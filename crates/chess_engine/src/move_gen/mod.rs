//! Move generation
//!
//! Two layers:
//!
//! - **Pseudo-legal** moves follow each piece's movement pattern and the board
//!   edges, but may leave the mover's own king attacked.
//! - **Legal** moves are the pseudo-legal moves that survive a make-and-test
//!   pass: each one is played on a scratch copy of the board and discarded if
//!   the mover's king is attacked afterwards.
//!
//! The make-and-test filter costs one board copy plus one attack scan per
//! candidate. That is cheap at 8x8 and keeps the generator obviously correct;
//! it is the first thing to replace if throughput ever matters.
//!
//! ## Module Organization
//!
//! - `pawn`, `knight`, `bishop`, `rook`, `queen`, `king` - per-piece generators
//! - `sliding` - ray walking shared by bishops, rooks and queens
//! - `attack` - square attack and check detection

pub mod attack;
pub mod bishop;
pub mod king;
pub mod knight;
pub mod pawn;
pub mod queen;
pub mod rook;
pub mod sliding;


pub use attack::{is_in_check, is_square_attacked};

use crate::board::Board;
use crate::make_unmake::make_move;
use crate::types::*;

/// Pseudo-legal moves of the piece standing on `from`
///
/// Returns an empty list for an empty square.
pub fn pseudo_moves(board: &Board, from: Square) -> Vec<Move> {
    let mut moves = Vec::new();
    if let Some(piece) = board.piece_at(from) {
        generate_piece_moves(board, from, piece, &mut moves);
    }
    moves
}

/// Generate all pseudo-legal moves for a color
pub fn generate_pseudo_legal_moves(board: &Board, color: Color) -> Vec<Move> {
    let mut moves = Vec::with_capacity(64);
    for (from, piece) in board.pieces(color) {
        generate_piece_moves(board, from, piece, &mut moves);
    }
    moves
}

/// Generate all legal moves for a color
///
/// Each pseudo-legal move is played on a copy of the board; moves that leave
/// `color`'s king attacked are dropped.
pub fn legal_moves(board: &Board, color: Color) -> Vec<Move> {
    generate_pseudo_legal_moves(board, color)
        .into_iter()
        .filter(|mv| is_legal(board, *mv, color))
        .collect()
}

/// Check whether a pseudo-legal move keeps the mover's king safe
fn is_legal(board: &Board, mv: Move, color: Color) -> bool {
    let mut scratch = board.clone();
    make_move(&mut scratch, mv);
    !is_in_check(&scratch, color)
}

fn generate_piece_moves(board: &Board, from: Square, piece: Piece, moves: &mut Vec<Move>) {
    let color = piece.color;
    match piece.kind {
        PieceKind::Pawn => pawn::generate_pawn_moves(board, from, color, moves),
        PieceKind::Knight => knight::generate_knight_moves(board, from, color, moves),
        PieceKind::Bishop => bishop::generate_bishop_moves(board, from, color, moves),
        PieceKind::Rook => rook::generate_rook_moves(board, from, color, moves),
        PieceKind::Queen => queen::generate_queen_moves(board, from, color, moves),
        PieceKind::King => king::generate_king_moves(board, from, color, moves),
    }
}
