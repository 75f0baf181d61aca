//! Game server
//!
//! One tokio task owns every piece of mutable game state: the connection
//! table, the sessions, the lobby wait slot and the random source. Everything
//! else talks to it through a command channel, so commands run one at a time
//! and no session ever needs a lock.
//!
//! ## Commands
//!
//! - `Connect` / `Disconnect` - a websocket opened or closed
//! - `Client` - a decoded [`ClientMessage`] from a connected player
//! - `MatchTimeout` - the lobby wait ran out (posted by a timer)
//! - `SyntheticMove` - the synthetic opponent's thinking delay ended (posted
//!   by a timer)
//!
//! Timer commands carry the wait or ply they were scheduled for. By the time
//! one is delivered the state may have moved on (the player was paired, the
//! session ended), so each is checked against current state and dropped when
//! stale.
//!
//! ## Session lifetime
//!
//! Sessions leave the registry when their game finishes, when a human
//! participant disconnects, or when they sit without a move for longer than
//! the idle timeout.

use std::collections::HashMap;

use chess_engine::{Color, Move, Square};
use rand::SeedableRng;
use rand::rngs::StdRng;
use shared::{ClientMessage, ServerMessage};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender, WeakUnboundedSender};
use tokio::sync::oneshot;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::config::GameSettings;
use crate::error::ServerError;
use crate::ledger::GameFinished;
use crate::lobby::{Lobby, WaitingPlayer};
use crate::relay;
use crate::session::{Outbox, PlayerId, Seat, Session, SessionId};
use crate::timer::{self, TimerHandle};

enum Command {
    Connect {
        player: PlayerId,
        outbound: UnboundedSender<ServerMessage>,
        reply: oneshot::Sender<Result<(), ServerError>>,
    },
    Client {
        player: PlayerId,
        message: ClientMessage,
    },
    Disconnect {
        player: PlayerId,
    },
    MatchTimeout {
        player: PlayerId,
        session: SessionId,
    },
    SyntheticMove {
        session: SessionId,
        ply: usize,
    },
}

/// State owned by the game server task
pub struct GameServer {
    settings: GameSettings,
    /// Used to schedule timers; weak so the server stops once every handle is gone
    commands: WeakUnboundedSender<Command>,
    connections: HashMap<PlayerId, UnboundedSender<ServerMessage>>,
    sessions: HashMap<SessionId, Session>,
    player_sessions: HashMap<PlayerId, SessionId>,
    lobby: Lobby,
    rng: StdRng,
    events: UnboundedSender<GameFinished>,
}

impl GameServer {
    /// Start a game server task seeded from the OS
    ///
    /// Finished-game events are published on `events`.
    pub fn spawn(
        settings: GameSettings,
        events: UnboundedSender<GameFinished>,
    ) -> GameServerHandle {
        Self::spawn_with_rng(settings, events, StdRng::from_os_rng())
    }

    /// Start a game server task with a given random source
    pub fn spawn_with_rng(
        settings: GameSettings,
        events: UnboundedSender<GameFinished>,
        rng: StdRng,
    ) -> GameServerHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        let server = GameServer {
            settings,
            commands: tx.downgrade(),
            connections: HashMap::new(),
            sessions: HashMap::new(),
            player_sessions: HashMap::new(),
            lobby: Lobby::new(),
            rng,
            events,
        };
        tokio::spawn(server.run(rx));
        GameServerHandle { commands: tx }
    }

    async fn run(mut self, mut commands: UnboundedReceiver<Command>) {
        let period = self.settings.sweep_interval;
        let mut sweep = tokio::time::interval_at(Instant::now() + period, period);
        sweep.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!("[GAME] Game server started");
        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(command) => self.handle(command),
                    None => break,
                },
                _ = sweep.tick() => self.sweep_idle(),
            }
        }
        info!("[GAME] Game server stopped");
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::Connect {
                player,
                outbound,
                reply,
            } => {
                let _ = reply.send(self.connect(player, outbound));
            }
            Command::Client { player, message } => self.handle_client(player, message),
            Command::Disconnect { player } => self.disconnect(&player),
            Command::MatchTimeout { player, session } => self.match_timeout(&player, session),
            Command::SyntheticMove { session, ply } => self.synthetic_move(session, ply),
        }
    }

    // ========================================================================
    // Connections
    // ========================================================================

    fn connect(
        &mut self,
        player: PlayerId,
        outbound: UnboundedSender<ServerMessage>,
    ) -> Result<(), ServerError> {
        if self.connections.contains_key(&player) {
            warn!("[SOCKET] Refused second connection for {}", player);
            return Err(ServerError::AlreadyConnected(player));
        }
        info!("[SOCKET] {} connected", player);
        self.connections.insert(player, outbound);
        Ok(())
    }

    fn disconnect(&mut self, player: &PlayerId) {
        if self.connections.remove(player).is_none() {
            return;
        }
        info!("[SOCKET] {} disconnected", player);

        if let Some(waiting) = self.lobby.take_player(player) {
            info!("[LOBBY] {} left the wait slot", player);
            self.remove_session(waiting.session);
            return;
        }

        let Some(id) = self.player_sessions.get(player).copied() else {
            return;
        };
        if let Some(session) = self.sessions.get(&id) {
            let outbox: Outbox = session
                .opponents_of(player)
                .map(|p| (p.clone(), ServerMessage::OpponentLeft))
                .collect();
            self.deliver(outbox);
        }
        info!("[GAME] Session {} abandoned by {}", id, player);
        self.remove_session(id);
    }

    fn handle_client(&mut self, player: PlayerId, message: ClientMessage) {
        if !self.connections.contains_key(&player) {
            debug!("[SOCKET] Ignoring message from disconnected {}", player);
            return;
        }

        let result = match message {
            ClientMessage::Join => self.join(&player),
            ClientMessage::Move { from, to } => self.submit_move(&player, from, to),
            ClientMessage::RequestSyntheticOpponent => self.request_synthetic(&player),
        };

        if let Err(e) = result {
            warn!("[GAME] Rejected request from {}: {}", player, e);
            self.send(
                &player,
                ServerMessage::Rejected {
                    reason: e.to_string(),
                },
            );
        }
    }

    // ========================================================================
    // Matchmaking
    // ========================================================================

    fn join(&mut self, player: &PlayerId) -> Result<(), ServerError> {
        if let Some(session) = self.session_of(player) {
            if session.is_active() {
                return Err(ServerError::AlreadyInSession);
            }
            debug!("[LOBBY] {} is already waiting", player);
            return Ok(());
        }

        match self.lobby.take() {
            Some(waiting) => self.pair(waiting, player),
            None => self.wait(player),
        }
        Ok(())
    }

    /// Seat `player` opposite the waiting player
    fn pair(&mut self, waiting: WaitingPlayer, player: &PlayerId) {
        let Some(session) = self.sessions.get_mut(&waiting.session) else {
            warn!("[LOBBY] Wait slot pointed at missing session {}", waiting.session);
            self.wait(player);
            return;
        };

        let outbox = session.activate(Seat::Human(player.clone()), &mut self.rng);
        let id = session.id;
        self.player_sessions.insert(player.clone(), id);
        info!("[LOBBY] Paired {} with {} in session {}", waiting.player, player, id);
        self.deliver(outbox);
    }

    /// Put `player` in the empty wait slot and start the match timeout
    fn wait(&mut self, player: &PlayerId) {
        let session = Session::awaiting(player.clone());
        let id = session.id;
        let command = Command::MatchTimeout {
            player: player.clone(),
            session: id,
        };
        let Some(timeout) = self.schedule(self.settings.match_timeout, command) else {
            return;
        };

        self.sessions.insert(id, session);
        self.player_sessions.insert(player.clone(), id);
        let waiting = WaitingPlayer {
            player: player.clone(),
            session: id,
            timeout,
        };
        if let Err(waiting) = self.lobby.occupy(waiting) {
            warn!("[LOBBY] Wait slot already taken, dropping {}", waiting.player);
            self.remove_session(id);
            return;
        }
        info!(
            "[LOBBY] {} is waiting for an opponent (synthetic after {})",
            player,
            humantime::format_duration(self.settings.match_timeout)
        );
    }

    fn match_timeout(&mut self, player: &PlayerId, session: SessionId) {
        let Some(waiting) = self.lobby.take_expired(player, session) else {
            debug!("[LOBBY] Ignoring stale match timeout for {}", player);
            return;
        };
        info!("[LOBBY] No opponent for {}, assigning synthetic opponent", player);
        self.start_synthetic(waiting.session);
    }

    fn request_synthetic(&mut self, player: &PlayerId) -> Result<(), ServerError> {
        if let Some(waiting) = self.lobby.take_player(player) {
            info!("[LOBBY] {} asked for the synthetic opponent", player);
            self.start_synthetic(waiting.session);
            return Ok(());
        }
        if self.player_sessions.contains_key(player) {
            debug!("[LOBBY] {} already has a session, ignoring synthetic request", player);
            return Ok(());
        }

        let session = Session::awaiting(player.clone());
        let id = session.id;
        self.sessions.insert(id, session);
        self.player_sessions.insert(player.clone(), id);
        info!("[LOBBY] {} asked for the synthetic opponent", player);
        self.start_synthetic(id);
        Ok(())
    }

    fn start_synthetic(&mut self, id: SessionId) {
        let Some(session) = self.sessions.get_mut(&id) else {
            return;
        };
        let outbox = session.activate(Seat::Synthetic, &mut self.rng);
        info!("[GAME] Session {} started against the synthetic opponent", id);
        self.deliver(outbox);
        self.schedule_synthetic(id);
    }

    // ========================================================================
    // Moves
    // ========================================================================

    fn submit_move(
        &mut self,
        player: &PlayerId,
        from: Square,
        to: Square,
    ) -> Result<(), ServerError> {
        let id = *self
            .player_sessions
            .get(player)
            .ok_or(ServerError::NotInSession)?;
        let session = self.sessions.get_mut(&id).ok_or(ServerError::NotInSession)?;

        let mover = session.game.side_to_move();
        let mv = relay::submit_move(session, player, from, to)?;
        debug!("[GAME] {} played {} in session {}", player, mv, id);
        self.after_move(id, mover, mv);
        Ok(())
    }

    fn synthetic_move(&mut self, id: SessionId, ply: usize) {
        let Some(session) = self.sessions.get_mut(&id) else {
            debug!("[GAME] Ignoring synthetic move for removed session {}", id);
            return;
        };
        if session.game.ply() != ply {
            debug!("[GAME] Ignoring stale synthetic move for session {}", id);
            return;
        }
        session.synthetic_timer = None;

        let mover = session.game.side_to_move();
        let Some(mv) = relay::play_synthetic(session, &mut self.rng) else {
            return;
        };
        debug!("[GAME] Synthetic opponent played {} in session {}", mv, id);
        self.after_move(id, mover, mv);
    }

    /// Relay an applied move, then finish the game or hand the turn on
    fn after_move(&mut self, id: SessionId, mover: Color, mv: Move) {
        let Some(session) = self.sessions.get_mut(&id) else {
            return;
        };
        let mut outbox = relay::relay_move(session, mover, mv);

        if let Some(resolution) = relay::resolve_outcome(session, self.settings.points_per_win) {
            match resolution.winner {
                Some(color) => info!("[GAME] Session {} finished, {} wins", id, color),
                None => info!("[GAME] Session {} finished in stalemate", id),
            }
            outbox.extend(resolution.outbox);
            self.deliver(outbox);
            self.publish(resolution.events);
            self.remove_session(id);
            return;
        }

        self.deliver(outbox);
        self.schedule_synthetic(id);
    }

    /// Schedule the synthetic opponent's move if it is on move
    fn schedule_synthetic(&mut self, id: SessionId) {
        let Some(session) = self.sessions.get(&id) else {
            return;
        };
        if !session.synthetic_to_move() {
            return;
        }
        let command = Command::SyntheticMove {
            session: id,
            ply: session.game.ply(),
        };
        let timer = self.schedule(self.settings.synthetic_move_delay, command);
        if let Some(session) = self.sessions.get_mut(&id) {
            session.synthetic_timer = timer;
        }
    }

    // ========================================================================
    // Eviction
    // ========================================================================

    fn sweep_idle(&mut self) {
        let now = Instant::now();
        let limit = self.settings.session_idle_timeout;
        let expired: Vec<SessionId> = self
            .sessions
            .values()
            .filter(|s| s.is_active() && now.duration_since(s.last_activity) >= limit)
            .map(|s| s.id)
            .collect();

        for id in expired {
            if let Some(session) = self.sessions.get(&id) {
                self.deliver(session.broadcast(ServerMessage::SessionExpired));
            }
            info!(
                "[GAME] Session {} expired after {} without a move",
                id,
                humantime::format_duration(limit)
            );
            self.remove_session(id);
        }
    }

    /// Drop a session and its timers, and free its players
    fn remove_session(&mut self, id: SessionId) {
        let Some(session) = self.sessions.remove(&id) else {
            return;
        };
        for player in session.players() {
            if self.player_sessions.get(player) == Some(&id) {
                self.player_sessions.remove(player);
            }
        }
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn session_of(&self, player: &PlayerId) -> Option<&Session> {
        self.player_sessions
            .get(player)
            .and_then(|id| self.sessions.get(id))
    }

    fn schedule(&self, delay: std::time::Duration, command: Command) -> Option<TimerHandle> {
        let sender = self.commands.upgrade()?;
        Some(timer::schedule(sender, delay, command))
    }

    fn deliver(&self, outbox: Outbox) {
        for (player, message) in outbox {
            self.send(&player, message);
        }
    }

    fn send(&self, player: &PlayerId, message: ServerMessage) {
        match self.connections.get(player) {
            Some(outbound) => {
                if outbound.send(message).is_err() {
                    debug!("[SOCKET] Connection of {} already closed", player);
                }
            }
            None => debug!("[SOCKET] No connection for {}", player),
        }
    }

    fn publish(&self, events: Vec<GameFinished>) {
        for event in events {
            if self.events.send(event).is_err() {
                warn!("[GAME] Ledger is not running, finished-game event dropped");
            }
        }
    }
}

/// Clonable handle to a running game server
#[derive(Clone)]
pub struct GameServerHandle {
    commands: UnboundedSender<Command>,
}

impl GameServerHandle {
    /// Register a connection for `player`
    ///
    /// # Errors
    ///
    /// [`ServerError::AlreadyConnected`] when `player` has a live connection,
    /// [`ServerError::Unavailable`] when the server task has stopped.
    pub async fn connect(&self, player: PlayerId) -> Result<Connection, ServerError> {
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let (reply_tx, reply_rx) = oneshot::channel();
        self.commands
            .send(Command::Connect {
                player: player.clone(),
                outbound: outbound_tx,
                reply: reply_tx,
            })
            .map_err(|_| ServerError::Unavailable)?;
        reply_rx.await.map_err(|_| ServerError::Unavailable)??;

        Ok(Connection {
            player,
            outbound: outbound_rx,
            commands: self.commands.clone(),
        })
    }
}

/// A player's registered connection
///
/// Dropping it disconnects the player.
pub struct Connection {
    player: PlayerId,
    outbound: UnboundedReceiver<ServerMessage>,
    commands: UnboundedSender<Command>,
}

impl Connection {
    pub fn player(&self) -> &PlayerId {
        &self.player
    }

    /// Forward a client message to the server
    pub fn send(&self, message: ClientMessage) -> Result<(), ServerError> {
        self.commands
            .send(Command::Client {
                player: self.player.clone(),
                message,
            })
            .map_err(|_| ServerError::Unavailable)
    }

    /// Next message for this player, `None` once the server stopped
    pub async fn recv(&mut self) -> Option<ServerMessage> {
        self.outbound.recv().await
    }

    /// Next message if one is already queued
    pub fn try_recv(&mut self) -> Option<ServerMessage> {
        self.outbound.try_recv().ok()
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        let _ = self.commands.send(Command::Disconnect {
            player: self.player.clone(),
        });
    }
}

#[cfg(test)]
mod tests;
