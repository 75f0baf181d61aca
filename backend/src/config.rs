//! Server configuration
//!
//! Read from the environment (after loading `.env`). Every variable is
//! optional; durations use humantime syntax such as `30s` or `2m`.
//!
//! | Variable | Default |
//! |---|---|
//! | `BIND_ADDR` | `0.0.0.0:3000` |
//! | `DATABASE_URL` | unset: points live in memory |
//! | `MATCH_TIMEOUT` | `30s` |
//! | `SYNTHETIC_MOVE_DELAY` | `2s` |
//! | `POINTS_PER_WIN` | `100` |
//! | `SESSION_IDLE_TIMEOUT` | `30m` |
//! | `SWEEP_INTERVAL` | `60s` |

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;

/// Timing and scoring rules of the game server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSettings {
    /// How long a lone player waits before getting the synthetic opponent
    pub match_timeout: Duration,
    /// Pause before each synthetic move
    pub synthetic_move_delay: Duration,
    /// Points awarded to a human who wins
    pub points_per_win: u32,
    /// Active sessions without a move for this long are dropped
    pub session_idle_timeout: Duration,
    /// How often idle sessions are looked for
    pub sweep_interval: Duration,
}

impl Default for GameSettings {
    fn default() -> Self {
        GameSettings {
            match_timeout: Duration::from_secs(30),
            synthetic_move_delay: Duration::from_secs(2),
            points_per_win: 100,
            session_idle_timeout: Duration::from_secs(30 * 60),
            sweep_interval: Duration::from_secs(60),
        }
    }
}

/// Full process configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub database_url: Option<String>,
    pub game: GameSettings,
}

impl ServerConfig {
    /// Read configuration from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = GameSettings::default();
        let read = |var: &'static str| lookup(var).filter(|v| !v.trim().is_empty());

        let bind_addr = match read("BIND_ADDR") {
            Some(v) => parse_value("BIND_ADDR", &v)?,
            None => SocketAddr::from(([0, 0, 0, 0], 3000)),
        };

        let duration = |var: &'static str, default: Duration| match read(var) {
            Some(v) => humantime::parse_duration(v.trim()).map_err(|e| ConfigError::Invalid {
                var,
                reason: e.to_string(),
            }),
            None => Ok(default),
        };

        let game = GameSettings {
            match_timeout: duration("MATCH_TIMEOUT", defaults.match_timeout)?,
            synthetic_move_delay: duration("SYNTHETIC_MOVE_DELAY", defaults.synthetic_move_delay)?,
            points_per_win: match read("POINTS_PER_WIN") {
                Some(v) => parse_value("POINTS_PER_WIN", &v)?,
                None => defaults.points_per_win,
            },
            session_idle_timeout: duration("SESSION_IDLE_TIMEOUT", defaults.session_idle_timeout)?,
            sweep_interval: duration("SWEEP_INTERVAL", defaults.sweep_interval)?,
        };

        if game.sweep_interval.is_zero() {
            return Err(ConfigError::Invalid {
                var: "SWEEP_INTERVAL",
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(ServerConfig {
            bind_addr,
            database_url: read("DATABASE_URL"),
            game,
        })
    }
}

fn parse_value<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        var,
        reason: e.to_string(),
    })
}
