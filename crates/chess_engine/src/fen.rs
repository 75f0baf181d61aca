//! FEN serialization
//!
//! Converts between [`Board`] and the six-field FEN record:
//!
//! ```text
//! rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1
//! |                                           | |    |  | |
//! piece placement (rank 8 first)              | |    |  | full-move number
//!                                  side to move |    |  half-move clock
//!                                  castling rights   en-passant target
//! ```
//!
//! Parsing is strict: any malformed field is an error, nothing is defaulted.
//! A record must also describe a reachable turn: one king per side, and the
//! side that is not to move may not be in check.

use crate::board::Board;
use crate::error::ParseError;
use crate::move_gen::is_in_check;
use crate::types::*;

/// Parse a FEN record into a board
pub fn parse_fen(text: &str) -> Result<Board, ParseError> {
    let fields: Vec<&str> = text.split_whitespace().collect();
    if fields.len() != 6 {
        return Err(ParseError::FieldCount(fields.len()));
    }

    let squares = parse_placement(fields[0])?;

    let side_to_move = match fields[1] {
        "w" => Color::White,
        "b" => Color::Black,
        other => return Err(ParseError::InvalidSideToMove(other.to_string())),
    };

    let castling = parse_castling(fields[2])?;

    let en_passant = match fields[3] {
        "-" => None,
        name => {
            let square: Square = name
                .parse()
                .map_err(|_| ParseError::InvalidEnPassant(name.to_string()))?;
            if square.rank() != 2 && square.rank() != 5 {
                return Err(ParseError::InvalidEnPassant(name.to_string()));
            }
            Some(square)
        }
    };

    let halfmove_clock = parse_counter(fields[4], "half-move clock")?;
    let fullmove_number = parse_counter(fields[5], "full-move number")?;
    if fullmove_number == 0 {
        return Err(ParseError::InvalidCounter {
            field: "full-move number",
            value: fields[5].to_string(),
        });
    }

    let board = Board {
        squares,
        side_to_move,
        castling,
        en_passant,
        halfmove_clock,
        fullmove_number,
    };

    for color in [Color::White, Color::Black] {
        let count = board
            .pieces(color)
            .filter(|(_, p)| p.kind == PieceKind::King)
            .count();
        if count != 1 {
            return Err(ParseError::KingCount { color, count });
        }
    }

    // Otherwise the side to move could capture a king
    let idle = board.side_to_move.opposite();
    if is_in_check(&board, idle) {
        return Err(ParseError::KingCapturable { color: idle });
    }

    Ok(board)
}

/// Format a board as a FEN record
pub fn format_fen(board: &Board) -> String {
    let mut ranks = Vec::with_capacity(8);

    for rank in (0..8).rev() {
        let mut row = String::new();
        let mut empty = 0;
        for file in 0..8 {
            let piece = Square::from_coords(file, rank).and_then(|sq| board.piece_at(sq));
            match piece {
                None => empty += 1,
                Some(p) => {
                    if empty > 0 {
                        row.push_str(&empty.to_string());
                        empty = 0;
                    }
                    row.push(p.fen_char());
                }
            }
        }
        if empty > 0 {
            row.push_str(&empty.to_string());
        }
        ranks.push(row);
    }

    let en_passant = board
        .en_passant
        .map(|sq| sq.to_string())
        .unwrap_or_else(|| "-".to_string());

    format!(
        "{} {} {} {} {} {}",
        ranks.join("/"),
        board.side_to_move.fen_char(),
        board.castling,
        en_passant,
        board.halfmove_clock,
        board.fullmove_number
    )
}

fn parse_placement(field: &str) -> Result<[Option<Piece>; 64], ParseError> {
    let rows: Vec<&str> = field.split('/').collect();
    if rows.len() != 8 {
        return Err(ParseError::RankCount(rows.len()));
    }

    let mut squares = [None; 64];
    for (i, row) in rows.iter().enumerate() {
        let rank = 7 - i as i8;
        let mut file: usize = 0;
        for c in row.chars() {
            if let Some(run) = c.to_digit(10) {
                if run == 0 || run > 8 {
                    return Err(ParseError::InvalidPiece(c));
                }
                file += run as usize;
            } else {
                let piece = Piece::from_fen_char(c).ok_or(ParseError::InvalidPiece(c))?;
                if let Some(sq) = Square::from_coords(file as i8, rank) {
                    squares[sq.index()] = Some(piece);
                }
                file += 1;
            }
            if file > 8 {
                break;
            }
        }
        if file != 8 {
            return Err(ParseError::RankWidth {
                rank: rank as u8 + 1,
                width: file,
            });
        }
    }

    Ok(squares)
}

fn parse_castling(field: &str) -> Result<CastlingRights, ParseError> {
    if field == "-" {
        return Ok(CastlingRights::NONE);
    }

    let invalid = || ParseError::InvalidCastling(field.to_string());
    let mut rights = CastlingRights::NONE;
    for c in field.chars() {
        let flag = match c {
            'K' => &mut rights.white_kingside,
            'Q' => &mut rights.white_queenside,
            'k' => &mut rights.black_kingside,
            'q' => &mut rights.black_queenside,
            _ => return Err(invalid()),
        };
        if *flag {
            return Err(invalid());
        }
        *flag = true;
    }
    Ok(rights)
}

fn parse_counter(value: &str, field: &'static str) -> Result<u32, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidCounter {
        field,
        value: value.to_string(),
    })
}
