//! Realtime two-player chess backend
//!
//! Players connect over a websocket, are paired in a single-slot lobby (or
//! handed a synthetic opponent when nobody shows up in time), and play
//! through a relay that validates every move with [`chess_engine`].
//! Finished games are published as [`ledger::GameFinished`] events and
//! credited by a [`ledger::PointsLedger`].

pub mod api;
pub mod config;
pub mod error;
pub mod game;
pub mod ledger;
pub mod lobby;
pub mod relay;
pub mod session;
pub mod socket;
pub mod timer;

pub use config::{GameSettings, ServerConfig};
pub use error::ServerError;
pub use game::{Connection, GameServer, GameServerHandle};
pub use session::PlayerId;
