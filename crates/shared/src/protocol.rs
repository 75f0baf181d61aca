//! Wire protocol
//!
//! Every frame is a JSON object tagged by a camelCase `type` field:
//!
//! ```text
//! {"type":"join"}
//! {"type":"move","from":"e2","to":"e4"}
//! {"type":"colorAssigned","color":"white"}
//! {"type":"gameFinished","winner":null}
//! ```
//!
//! Squares travel as algebraic names and colors as `"white"` / `"black"`.

use chess_engine::{Color, Move, PieceKind, Square};
use serde::{Deserialize, Serialize};

/// Messages a client sends to the server
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMessage {
    /// Enter matchmaking
    Join,
    /// Submit a move for the sender's active session
    Move { from: Square, to: Square },
    /// Skip the wait and play the synthetic opponent now
    RequestSyntheticOpponent,
}

/// Messages the server sends to a client
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMessage {
    /// A session began; `color` is the recipient's side
    ColorAssigned { color: Color },
    /// The opponent's move, exactly as applied
    Move {
        from: Square,
        to: Square,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        promotion: Option<PieceKind>,
    },
    /// The human opponent disconnected
    OpponentLeft,
    /// The game ended; `null` winner is a stalemate
    GameFinished { winner: Option<Color> },
    /// The last client message was refused
    Rejected { reason: String },
    /// The session was dropped after a long period without moves
    SessionExpired,
}

impl From<Move> for ServerMessage {
    fn from(mv: Move) -> Self {
        ServerMessage::Move {
            from: mv.from,
            to: mv.to,
            promotion: mv.promotion,
        }
    }
}
