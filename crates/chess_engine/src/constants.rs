//! # Chess Engine Constants - Direction Vectors & Start Position
//!
//! ## Direction Vectors for Move Generation
//!
//! Movement is encoded as `(file delta, rank delta)` pairs instead of flat
//! index offsets. A flat offset like `+9` silently wraps from the h-file to the
//! a-file; a coordinate pair goes through [`Square::offset`](crate::types::Square::offset),
//! which returns `None` at the board edge, so no generator needs wrap checks.
//!
//! - **Rook**: the four orthogonal rays
//! - **Bishop**: the four diagonal rays
//! - **Queen**: both sets
//! - **Knight**: the eight L-shaped jumps
//! - **King**: the eight neighbours
//!
//! ## Castling Geometry
//!
//! Castling squares are stored as files; the rank is the mover's back rank.
//! The king always starts on the e-file, the rooks on the a- and h-files.

/// Standard starting position in FEN
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

pub const ROOK_DIRS: [(i8, i8); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

pub const BISHOP_DIRS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

pub const QUEEN_DIRS: [(i8, i8); 8] = [
    (0, 1),
    (1, 0),
    (0, -1),
    (-1, 0),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

pub const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

pub const KING_OFFSETS: [(i8, i8); 8] = QUEEN_DIRS;

/// File the king starts on
pub const KING_START_FILE: i8 = 4;

/// Rook start files for (queen side, king side)
pub const ROOK_START_FILES: (i8, i8) = (0, 7);

/// King destination files for (queen side, king side)
pub const CASTLE_KING_FILES: (i8, i8) = (2, 6);

/// Rook destination files for (queen side, king side)
pub const CASTLE_ROOK_FILES: (i8, i8) = (3, 5);
