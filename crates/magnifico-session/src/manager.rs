//! The login registry.
//!
//! `SessionManager` is not shared by itself; the server owns it behind a
//! mutex, the same way it owns the room manager.

use std::collections::HashMap;
use std::time::Duration;

use magnifico_protocol::{PlayerId, RoomId};
use rand::Rng;
use tokio::time::Instant;

use crate::{Session, SessionConfig, SessionError, SessionState};

/// Who is logged in, who dropped recently, and which token belongs to whom.
///
/// ```text
///   login() ──→ [Connected] ──disconnect()──→ [Disconnected]
///                    ↑                             │
///                    └────────reconnect()──────────┤
///                                                  ▼ grace elapsed
///                                     sweep() removes the session
/// ```
pub struct SessionManager {
    by_player: HashMap<PlayerId, Session>,
    /// Reconnection token → owner. Every live session has exactly one.
    by_token: HashMap<String, PlayerId>,
    grace: Duration,
}

impl SessionManager {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            by_player: HashMap::new(),
            by_token: HashMap::new(),
            grace: Duration::from_secs(config.reconnect_grace_secs),
        }
    }

    /// Registers a login and issues a fresh reconnection token.
    ///
    /// A username that is still connected cannot log in twice. Any older
    /// session for the same username is replaced, seat record included,
    /// and its token stops working.
    pub fn login(&mut self, player_id: PlayerId) -> Result<&Session, SessionError> {
        if let Some(previous) = self.by_player.remove(&player_id) {
            if previous.is_connected() {
                self.by_player.insert(player_id.clone(), previous);
                return Err(SessionError::AlreadyConnected(player_id));
            }
            self.by_token.remove(&previous.reconnect_token);
        }

        let reconnect_token = new_token();
        self.by_token.insert(reconnect_token.clone(), player_id.clone());
        tracing::info!(%player_id, "session opened");

        Ok(self
            .by_player
            .entry(player_id.clone())
            .or_insert(Session {
                player_id,
                state: SessionState::Connected,
                reconnect_token,
                room: None,
            }))
    }

    /// Records the room a player is seated in.
    pub fn seat(&mut self, player_id: &PlayerId, room: RoomId) -> Result<(), SessionError> {
        self.session_mut(player_id)?.room = Some(room);
        tracing::debug!(%player_id, room_id = %room, "session seated");
        Ok(())
    }

    /// Marks a player's link as gone and starts their grace period.
    pub fn disconnect(&mut self, player_id: &PlayerId) -> Result<(), SessionError> {
        let session = self.session_mut(player_id)?;
        if session.is_connected() {
            session.state = SessionState::Disconnected {
                since: Instant::now(),
            };
            tracing::info!(%player_id, "link dropped, grace period running");
        }
        Ok(())
    }

    /// Re-attaches a disconnected player by token.
    ///
    /// # Errors
    /// - [`SessionError::InvalidToken`] if the token is unknown
    /// - [`SessionError::SessionExpired`] if the grace period elapsed
    /// - [`SessionError::AlreadyConnected`] if the link never dropped
    pub fn reconnect(&mut self, token: &str) -> Result<&Session, SessionError> {
        let player_id = self
            .by_token
            .get(token)
            .cloned()
            .ok_or(SessionError::InvalidToken)?;
        let grace = self.grace;
        let session = self
            .by_player
            .get_mut(&player_id)
            .ok_or(SessionError::InvalidToken)?;

        if session.is_connected() {
            return Err(SessionError::AlreadyConnected(player_id));
        }
        if session.grace_elapsed(grace) {
            session.state = SessionState::Expired;
            return Err(SessionError::SessionExpired(player_id));
        }
        session.state = SessionState::Connected;
        tracing::info!(%player_id, room = ?session.room, "player reconnected");
        Ok(session)
    }

    /// Drops every session whose grace period elapsed, tokens included.
    ///
    /// Returns the players that were dropped.
    pub fn sweep(&mut self) -> Vec<PlayerId> {
        let grace = self.grace;
        let stale: Vec<PlayerId> = self
            .by_player
            .values()
            .filter(|session| session.grace_elapsed(grace))
            .map(|session| session.player_id.clone())
            .collect();

        for player_id in &stale {
            if let Some(session) = self.by_player.remove(player_id) {
                self.by_token.remove(&session.reconnect_token);
                tracing::info!(%player_id, "session expired");
            }
        }
        stale
    }

    pub fn get(&self, player_id: &PlayerId) -> Option<&Session> {
        self.by_player.get(player_id)
    }

    pub fn len(&self) -> usize {
        self.by_player.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_player.is_empty()
    }

    fn session_mut(&mut self, player_id: &PlayerId) -> Result<&mut Session, SessionError> {
        self.by_player
            .get_mut(player_id)
            .ok_or_else(|| SessionError::NotFound(player_id.clone()))
    }
}

/// 16 random bytes as 32 lowercase hex characters.
fn new_token() -> String {
    let bytes: [u8; 16] = rand::rng().random();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
