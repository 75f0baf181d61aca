//! Move execution
//!
//! Applies a move to a [`Board`] without checking legality. Callers either
//! pass moves taken from the generator ([`crate::move_gen`]) or play on a
//! scratch copy during legality filtering. Undo is done by restoring a
//! snapshot of the board, see [`crate::api::Game::undo_move`].
//!
//! Besides moving the piece, a move updates:
//! - the captured square (including the pawn taken en passant)
//! - the rook, when the king castles
//! - castling rights, when a king or rook leaves its home square or a piece
//!   lands on a rook's home square
//! - the en-passant target (set by a double push, cleared otherwise)
//! - the half-move clock (reset by captures and pawn moves)
//! - side to move and the full-move number (after black moves)
//!
//! Both counters saturate at `u32::MAX`.

use crate::board::Board;
use crate::constants::*;
use crate::move_gen::pawn::en_passant_victim_square;
use crate::types::*;

/// Make a move on the board, returning the captured piece if any
pub(crate) fn make_move(board: &mut Board, mv: Move) -> Option<Piece> {
    let Some(piece) = board.take(mv.from) else {
        return None;
    };
    let color = piece.color;

    let mut captured = board.take(mv.to);

    // En passant: a pawn moving diagonally onto the empty target square
    if piece.kind == PieceKind::Pawn
        && captured.is_none()
        && mv.from.file() != mv.to.file()
        && board.en_passant == Some(mv.to)
    {
        if let Some(victim) = en_passant_victim_square(mv.to, color) {
            captured = board.take(victim);
        }
    }

    let placed = match piece.kind {
        PieceKind::Pawn if mv.to.rank() == color.opposite().back_rank() as i8 => {
            Piece::new(color, mv.promotion.unwrap_or(PieceKind::Queen))
        }
        _ => piece,
    };
    board.set(mv.to, Some(placed));

    if piece.kind == PieceKind::King && (mv.to.file() - mv.from.file()).abs() == 2 {
        move_castling_rook(board, color, mv.to.file());
    }

    update_castling_rights(board, piece, mv);

    board.en_passant = match piece.kind {
        PieceKind::Pawn if (mv.to.rank() - mv.from.rank()).abs() == 2 => {
            mv.from.offset(0, color.pawn_direction())
        }
        _ => None,
    };

    if piece.kind == PieceKind::Pawn || captured.is_some() {
        board.halfmove_clock = 0;
    } else {
        board.halfmove_clock = board.halfmove_clock.saturating_add(1);
    }

    if color == Color::Black {
        board.fullmove_number = board.fullmove_number.saturating_add(1);
    }
    board.side_to_move = color.opposite();

    captured
}

fn move_castling_rook(board: &mut Board, color: Color, king_to_file: i8) {
    let (rook_from, rook_to) = if king_to_file == CASTLE_KING_FILES.1 {
        (ROOK_START_FILES.1, CASTLE_ROOK_FILES.1)
    } else {
        (ROOK_START_FILES.0, CASTLE_ROOK_FILES.0)
    };

    if let (Some(from), Some(to)) = (
        Board::back_rank_square(color, rook_from),
        Board::back_rank_square(color, rook_to),
    ) {
        let rook = board.take(from);
        board.set(to, rook);
    }
}

fn update_castling_rights(board: &mut Board, piece: Piece, mv: Move) {
    if piece.kind == PieceKind::King {
        board.castling.remove_color(piece.color);
    }

    // Leaving a corner means the rook moved; landing on one means it was taken
    for square in [mv.from, mv.to] {
        if let Some((color, side)) = rook_home_owner(square) {
            board.castling.remove(color, side);
        }
    }
}

/// Which castling right a rook home square guards
fn rook_home_owner(square: Square) -> Option<(Color, CastleSide)> {
    for color in [Color::White, Color::Black] {
        if square.rank() != color.back_rank() as i8 {
            continue;
        }
        if square.file() == ROOK_START_FILES.0 {
            return Some((color, CastleSide::QueenSide));
        }
        if square.file() == ROOK_START_FILES.1 {
            return Some((color, CastleSide::KingSide));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fen::{format_fen, parse_fen};

    fn mv(s: &str) -> Move {
        Move::from_uci(s).unwrap()
    }

    #[test]
    fn test_double_push_sets_en_passant_target() {
        let mut board = Board::default();
        make_move(&mut board, mv("e2e4"));
        assert_eq!(board.en_passant_target(), Some("e3".parse().unwrap()));
        assert_eq!(board.side_to_move(), Color::Black);
        assert_eq!(board.fullmove_number(), 1);

        make_move(&mut board, mv("g8f6"));
        assert_eq!(board.en_passant_target(), None);
        assert_eq!(board.fullmove_number(), 2);
        assert_eq!(board.halfmove_clock(), 1);
    }

    #[test]
    fn test_en_passant_removes_passed_pawn() {
        let mut board = parse_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").unwrap();
        let captured = make_move(&mut board, mv("e5d6"));
        assert_eq!(captured, Some(Piece::new(Color::Black, PieceKind::Pawn)));
        assert!(board.is_empty("d5".parse().unwrap()));
        assert_eq!(format_fen(&board), "4k3/8/3P4/8/8/8/8/4K3 b - - 0 1");
    }

    #[test]
    fn test_castling_relocates_rook() {
        let mut board = parse_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 3 10").unwrap();
        make_move(&mut board, mv("e1g1"));
        assert_eq!(format_fen(&board), "r3k2r/8/8/8/8/8/8/R4RK1 b kq - 4 10");

        make_move(&mut board, mv("e8c8"));
        assert_eq!(format_fen(&board), "2kr3r/8/8/8/8/8/8/R4RK1 w - - 5 11");
    }

    #[test]
    fn test_rook_capture_on_home_square_clears_right() {
        let mut board = parse_fen("r3k2r/8/8/8/8/8/6b1/R3K2R b KQkq - 0 1").unwrap();
        make_move(&mut board, mv("g2h1"));
        assert!(!board.castling_rights().white_kingside);
        assert!(board.castling_rights().white_queenside);
        assert_eq!(board.halfmove_clock(), 0);
    }

    #[test]
    fn test_counters_saturate_at_max() {
        let mut board = parse_fen("4k3/8/8/8/8/8/8/4K3 b - - 4294967295 4294967295").unwrap();
        make_move(&mut board, mv("e8d8"));
        assert_eq!(board.halfmove_clock(), u32::MAX);
        assert_eq!(board.fullmove_number(), u32::MAX);
        assert_eq!(
            format_fen(&board),
            "3k4/8/8/8/8/8/8/4K3 w - - 4294967295 4294967295"
        );
    }

    #[test]
    fn test_promotion_defaults_to_queen() {
        let mut board = parse_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        make_move(&mut board, mv("a7a8"));
        assert_eq!(
            board.piece_at("a8".parse().unwrap()),
            Some(Piece::new(Color::White, PieceKind::Queen))
        );
    }
}
