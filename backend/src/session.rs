//! Sessions
//!
//! A session is one game between two participants, one of which may be the
//! synthetic opponent. It moves through three states:
//!
//! ```text
//! AwaitingOpponent --(paired / synthetic assigned)--> Active --(checkmate / stalemate)--> Finished
//! ```
//!
//! Sessions are owned by the game server; players only hold a [`SessionId`].

use std::fmt;

use chess_engine::{Color, Game};
use rand::Rng;
use serde::{Deserialize, Serialize};
use shared::ServerMessage;
use tokio::time::Instant;
use uuid::Uuid;

use crate::lobby::draw_colors;
use crate::timer::TimerHandle;

/// Messages addressed to players, delivered after a state change
pub type Outbox = Vec<(PlayerId, ServerMessage)>;

/// Identity a player connects with
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    /// Build an identity, `None` when blank
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(PlayerId(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique id of one pairing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        SessionId(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionState {
    AwaitingOpponent,
    Active,
    Finished,
}

/// Who occupies a side of the board
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Seat {
    Human(PlayerId),
    Synthetic,
}

/// One side of a session; `color` is set once the session starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub seat: Seat,
    pub color: Option<Color>,
}

impl Participant {
    pub fn player(&self) -> Option<&PlayerId> {
        match &self.seat {
            Seat::Human(id) => Some(id),
            Seat::Synthetic => None,
        }
    }

    pub fn is_synthetic(&self) -> bool {
        self.seat == Seat::Synthetic
    }
}

#[derive(Debug)]
pub struct Session {
    pub id: SessionId,
    pub game: Game,
    pub state: SessionState,
    pub participants: Vec<Participant>,
    pub last_activity: Instant,
    /// Pending synthetic move, aborted when the session is dropped
    pub(crate) synthetic_timer: Option<TimerHandle>,
}

impl Session {
    /// A session holding one waiting player and a fresh game
    pub fn awaiting(host: PlayerId) -> Self {
        Session {
            id: SessionId::new(),
            game: Game::new(),
            state: SessionState::AwaitingOpponent,
            participants: vec![Participant {
                seat: Seat::Human(host),
                color: None,
            }],
            last_activity: Instant::now(),
            synthetic_timer: None,
        }
    }

    /// Seat the opponent, draw colors and start the game
    ///
    /// Returns a `colorAssigned` message for every human participant.
    pub fn activate<R: Rng + ?Sized>(&mut self, opponent: Seat, rng: &mut R) -> Outbox {
        let (host_color, opponent_color) = draw_colors(rng);
        if let Some(host) = self.participants.first_mut() {
            host.color = Some(host_color);
        }
        self.participants.push(Participant {
            seat: opponent,
            color: Some(opponent_color),
        });
        self.state = SessionState::Active;
        self.touch();

        self.participants
            .iter()
            .filter_map(|p| {
                let color = p.color?;
                p.player()
                    .map(|id| (id.clone(), ServerMessage::ColorAssigned { color }))
            })
            .collect()
    }

    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }

    /// Color a human player was assigned
    pub fn color_of(&self, player: &PlayerId) -> Option<Color> {
        self.participants
            .iter()
            .find(|p| p.player() == Some(player))
            .and_then(|p| p.color)
    }

    /// Human participants
    pub fn players(&self) -> impl Iterator<Item = &PlayerId> + '_ {
        self.participants.iter().filter_map(Participant::player)
    }

    /// Human participants other than `player`
    pub fn opponents_of<'a>(
        &'a self,
        player: &'a PlayerId,
    ) -> impl Iterator<Item = &'a PlayerId> + 'a {
        self.players().filter(move |p| *p != player)
    }

    pub fn has_synthetic(&self) -> bool {
        self.participants.iter().any(Participant::is_synthetic)
    }

    /// Whether the synthetic opponent is the side to move in a live game
    pub fn synthetic_to_move(&self) -> bool {
        let to_move = self.game.side_to_move();
        self.is_active()
            && self
                .participants
                .iter()
                .any(|p| p.is_synthetic() && p.color == Some(to_move))
    }

    /// Record activity for idle eviction
    pub fn touch(&mut self) {
        self.last_activity = Instant::now();
    }

    /// Message every human participant
    pub fn broadcast(&self, message: ServerMessage) -> Outbox {
        self.players().map(|p| (p.clone(), message.clone())).collect()
    }
}
