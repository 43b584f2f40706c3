//! Server configuration loaded from JSON.

use magnifico_room::GameSettings;
use magnifico_session::SessionConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid configuration JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Everything a [`GameServer`](crate::GameServer) needs besides the card
/// catalog.
///
/// Missing fields take their defaults; unknown fields are rejected.
///
/// ```json
/// {
///   "game": { "max_players": 3, "move_wait_ms": 90000 },
///   "session": { "reconnect_grace_secs": 60 }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Settings for rooms created by matchmaking.
    pub game: GameSettings,
    pub session: SessionConfig,
}

impl ServerConfig {
    /// Parses and checks a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.check()?;
        Ok(config)
    }

    /// Rejects settings that would leave a session with nothing to play.
    ///
    /// Capacity and quorum are not checked here; rooms clamp them.
    pub fn check(&self) -> Result<(), ConfigError> {
        let game = &self.game;
        if game.rounds == 0 || game.sub_rounds == 0 {
            return Err(ConfigError::Invalid(
                "rounds and sub_rounds must be positive".into(),
            ));
        }
        if game.move_wait_ms == 0 {
            return Err(ConfigError::Invalid("move_wait_ms must be positive".into()));
        }
        if game.draft_wait_ms == Some(0) {
            return Err(ConfigError::Invalid(
                "draft_wait_ms must be positive or null".into(),
            ));
        }
        Ok(())
    }
}
