//! Session records: who is logged in, in what state, and where they sit.

use std::time::Duration;

use magnifico_protocol::{PlayerId, RoomId};
use serde::{Deserialize, Serialize};
use tokio::time::Instant;

/// Session timing configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Seconds a disconnected player has to reconnect before the session
    /// expires. Zero disables reconnection.
    pub reconnect_grace_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            reconnect_grace_secs: 30,
        }
    }
}

/// Lifecycle of a session.
///
/// ```text
///   Connected ──(disconnect)──→ Disconnected ──(grace elapsed)──→ Expired
///       ↑                            │
///       └────────(reconnect)─────────┘
/// ```
#[derive(Debug, Clone)]
pub enum SessionState {
    Connected,
    /// Disconnected at `since`; reconnectable until `since + grace`.
    Disconnected { since: Instant },
    Expired,
}

/// One logged-in player.
#[derive(Debug, Clone)]
pub struct Session {
    pub player_id: PlayerId,
    pub state: SessionState,
    /// 32 hex characters, handed out at login and required to reconnect.
    pub reconnect_token: String,
    /// The room the player was seated in, if any.
    pub room: Option<RoomId>,
}

impl Session {
    pub fn is_connected(&self) -> bool {
        matches!(self.state, SessionState::Connected)
    }

    /// Whether a dropped link has been gone for at least `grace`. Expired
    /// sessions count as elapsed, connected ones never do.
    pub fn grace_elapsed(&self, grace: Duration) -> bool {
        match self.state {
            SessionState::Connected => false,
            SessionState::Disconnected { since } => since.elapsed() >= grace,
            SessionState::Expired => true,
        }
    }
}
