//! Matchmaking
//!
//! The lobby is a single wait slot, not a queue. A player who joins while
//! the slot is empty takes it and starts a match timeout; the next player to
//! join is paired with them. When the timeout fires first, the waiting
//! player gets the synthetic opponent instead.

use chess_engine::Color;
use rand::Rng;

use crate::session::{PlayerId, SessionId};
use crate::timer::TimerHandle;

/// Range the color draw picks from
const COLOR_DRAW_RANGE: std::ops::Range<u32> = 0..1000;

/// The player in the wait slot
#[derive(Debug)]
pub struct WaitingPlayer {
    pub player: PlayerId,
    pub session: SessionId,
    /// Match timeout, cancelled when the slot is vacated
    pub(crate) timeout: TimerHandle,
}

/// The single matchmaking wait slot
#[derive(Debug, Default)]
pub struct Lobby {
    slot: Option<WaitingPlayer>,
}

impl Lobby {
    pub fn new() -> Self {
        Self::default()
    }

    /// The player currently waiting, if any
    pub fn waiting(&self) -> Option<&WaitingPlayer> {
        self.slot.as_ref()
    }

    pub fn is_waiting(&self, player: &PlayerId) -> bool {
        self.slot.as_ref().is_some_and(|w| &w.player == player)
    }

    /// Put a player in the empty slot
    ///
    /// Returns the player back when the slot is taken.
    pub fn occupy(&mut self, waiting: WaitingPlayer) -> Result<(), WaitingPlayer> {
        if self.slot.is_some() {
            return Err(waiting);
        }
        self.slot = Some(waiting);
        Ok(())
    }

    /// Vacate the slot, cancelling its timeout
    pub fn take(&mut self) -> Option<WaitingPlayer> {
        self.slot.take()
    }

    /// Vacate the slot only if `player` holds it
    pub fn take_player(&mut self, player: &PlayerId) -> Option<WaitingPlayer> {
        if self.is_waiting(player) {
            self.slot.take()
        } else {
            None
        }
    }

    /// Vacate the slot only if it still holds this exact wait
    ///
    /// Used by the match timeout: a player who left and came back has a new
    /// session id, so an old timeout does not match.
    pub fn take_expired(&mut self, player: &PlayerId, session: SessionId) -> Option<WaitingPlayer> {
        match &self.slot {
            Some(w) if &w.player == player && w.session == session => self.slot.take(),
            _ => None,
        }
    }
}

/// Draw colors for the waiting player and their opponent
///
/// Each side draws a number; ties are redrawn and the higher number plays
/// white. Returns `(waiting player's color, opponent's color)`.
pub fn draw_colors<R: Rng + ?Sized>(rng: &mut R) -> (Color, Color) {
    loop {
        let first = rng.random_range(COLOR_DRAW_RANGE);
        let second = rng.random_range(COLOR_DRAW_RANGE);
        if first > second {
            return (Color::White, Color::Black);
        }
        if second > first {
            return (Color::Black, Color::White);
        }
    }
}
