//! Move relay and outcome resolution
//!
//! Pure session logic, no I/O: functions take a [`Session`] and return the
//! messages and events the game server should deliver.

use chess_engine::{Color, GameStatus, Move, Square, choose_move};
use rand::Rng;
use shared::ServerMessage;

use crate::error::ServerError;
use crate::ledger::{GameFinished, GameResult};
use crate::session::{Outbox, PlayerId, Session, SessionState};

/// What a finished game produces
#[derive(Debug, Default)]
pub struct Resolution {
    pub winner: Option<Color>,
    pub outbox: Outbox,
    pub events: Vec<GameFinished>,
}

/// Validate and apply a human player's move
///
/// # Errors
///
/// - [`ServerError::SessionNotActive`] before pairing or after the game ended
/// - [`ServerError::NotInSession`] when `player` has no seat in the session
/// - [`ServerError::InvalidTurn`] when the opponent is on move
/// - [`ServerError::IllegalMove`] when the move is not legal
///
/// The session is unchanged on every error.
pub fn submit_move(
    session: &mut Session,
    player: &PlayerId,
    from: Square,
    to: Square,
) -> Result<Move, ServerError> {
    if !session.is_active() {
        return Err(ServerError::SessionNotActive);
    }
    let color = session.color_of(player).ok_or(ServerError::NotInSession)?;
    if session.game.side_to_move() != color {
        return Err(ServerError::InvalidTurn);
    }

    let applied = session
        .game
        .apply_move(Move::new(from, to))
        .map_err(|_| ServerError::IllegalMove { from, to })?;
    session.touch();
    Ok(applied)
}

/// Let the synthetic opponent play if it is on move
///
/// Returns the applied move, or `None` when the session is not waiting on
/// the synthetic opponent.
pub fn play_synthetic<R: Rng + ?Sized>(session: &mut Session, rng: &mut R) -> Option<Move> {
    if !session.synthetic_to_move() {
        return None;
    }
    let legal = session.game.legal_moves();
    let choice = choose_move(session.game.board(), &legal, rng)?;
    let applied = session.game.apply_move(choice).ok()?;
    session.touch();
    Some(applied)
}

/// Forward a move to every human who did not make it
pub fn relay_move(session: &Session, mover: Color, mv: Move) -> Outbox {
    session
        .participants
        .iter()
        .filter(|p| p.color != Some(mover))
        .filter_map(|p| p.player())
        .map(|id| (id.clone(), ServerMessage::from(mv)))
        .collect()
}

/// Finish the session if the side to move has no legal move
///
/// Marks the session finished and returns the `gameFinished` messages plus
/// one [`GameFinished`] event per human. Returns `None` while the game goes
/// on or if the session was already finished, so an outcome is resolved at
/// most once.
pub fn resolve_outcome(session: &mut Session, points_per_win: u32) -> Option<Resolution> {
    if !session.is_active() {
        return None;
    }
    let winner = match session.game.status() {
        GameStatus::InProgress => return None,
        GameStatus::Checkmate => session.game.winner(),
        GameStatus::Stalemate => None,
    };
    session.state = SessionState::Finished;

    let mut resolution = Resolution {
        winner,
        outbox: session.broadcast(ServerMessage::GameFinished { winner }),
        events: Vec::new(),
    };

    for participant in &session.participants {
        let Some(player) = participant.player() else {
            continue;
        };
        let result = match (winner, participant.color) {
            (None, _) => GameResult::Draw,
            (Some(w), Some(c)) if w == c => GameResult::Win,
            _ => GameResult::Loss,
        };
        let points = if result == GameResult::Win {
            points_per_win
        } else {
            0
        };
        resolution.events.push(GameFinished {
            session: session.id,
            player: player.clone(),
            result,
            points,
        });
    }

    Some(resolution)
}
