//! `GameServer`: logins, matchmaking, decision routing and reconnection.
//!
//! This is the entry point for embedding a Magnifico server. It ties the
//! layers together: session (who is logged in) → room (where they sit and
//! what they decide). Transport is left to the embedder, who hands each
//! player's outbound link to [`GameServer::join`].

use std::marker::PhantomData;
use std::sync::Arc;

use magnifico_model::Catalog;
use magnifico_protocol::{Move, PlayerId, RoomId};
use magnifico_room::{GameSettings, PlayerSender, RoomError, RoomInfo, RoomManager, RuleEngine};
use magnifico_session::{Authenticator, SessionError, SessionManager};
use tokio::sync::Mutex;

use crate::{MagnificoError, ServerConfig};

/// What a successful login hands back to the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Login {
    pub player_id: PlayerId,
    /// Present this to [`GameServer::reconnect`] after the link drops.
    pub reconnect_token: String,
    /// The room the player is still seated in from an earlier login.
    pub room: Option<RoomId>,
}

/// Builder for a [`GameServer`].
///
/// # Example
///
/// ```rust,ignore
/// let server = GameServerBuilder::new()
///     .config(ServerConfig::from_json(&json)?)
///     .catalog(Catalog::from_json(&cards)?)
///     .build::<BasicRules, _>(UsernameAuthenticator::default());
/// ```
#[derive(Debug, Clone, Default)]
pub struct GameServerBuilder {
    config: ServerConfig,
    catalog: Catalog,
}

impl GameServerBuilder {
    /// Creates a builder with default settings and an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: ServerConfig) -> Self {
        self.config = config;
        self
    }

    /// Overrides only the settings used for new rooms.
    pub fn game_settings(mut self, settings: GameSettings) -> Self {
        self.config.game = settings;
        self
    }

    /// Sets the cards, tiles and leaders every room deals from.
    pub fn catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn build<G: RuleEngine, A: Authenticator>(self, auth: A) -> GameServer<G, A> {
        tracing::info!(
            cards = self.catalog.development_cards.len(),
            leaders = self.catalog.leader_cards.len(),
            tiles = self.catalog.personal_tiles.len(),
            "game server ready"
        );
        GameServer {
            sessions: Mutex::new(SessionManager::new(self.config.session)),
            rooms: Mutex::new(RoomManager::new(Arc::new(self.catalog), self.config.game)),
            auth,
            _rules: PhantomData,
        }
    }
}

/// A Magnifico server.
///
/// Shareable across tasks behind an `Arc`; the session and room managers
/// sit behind their own mutexes. When both are needed, `sessions` is
/// locked first.
pub struct GameServer<G: RuleEngine, A: Authenticator> {
    sessions: Mutex<SessionManager>,
    rooms: Mutex<RoomManager<G>>,
    auth: A,
    _rules: PhantomData<fn() -> G>,
}

impl<G: RuleEngine, A: Authenticator> GameServer<G, A> {
    /// Authenticates `credentials` and opens a session.
    ///
    /// A player still seated from an earlier session keeps their seat; the
    /// returned [`Login::room`] tells them so, and [`join`](Self::join)
    /// re-attaches them to it.
    pub async fn login(&self, credentials: &str) -> Result<Login, MagnificoError> {
        let player_id = self.auth.authenticate(credentials).await?;

        let mut sessions = self.sessions.lock().await;
        let reconnect_token = sessions.login(player_id.clone())?.reconnect_token.clone();

        let room = {
            let mut rooms = self.rooms.lock().await;
            rooms.prune_finished();
            rooms.player_room(&player_id)
        };
        if let Some(room) = room {
            sessions.seat(&player_id, room)?;
        }

        tracing::info!(%player_id, seated = room.is_some(), "player logged in");
        Ok(Login {
            player_id,
            reconnect_token,
            room,
        })
    }

    /// Seats a logged-in player and returns their room.
    ///
    /// The player enters the newest open room, or a new room sized by
    /// `capacity`. A player who is already seated is re-attached to their
    /// room through `link` instead.
    pub async fn join(
        &self,
        player_id: &PlayerId,
        capacity: Option<usize>,
        link: PlayerSender,
    ) -> Result<RoomId, MagnificoError> {
        let mut sessions = self.sessions.lock().await;
        match sessions.get(player_id) {
            Some(session) if session.is_connected() => {}
            _ => return Err(SessionError::NotFound(player_id.clone()).into()),
        }

        let room = {
            let mut rooms = self.rooms.lock().await;
            rooms.prune_finished();
            if rooms.player_room(player_id).is_some() {
                rooms.rejoin(player_id.clone(), link).await?
            } else {
                rooms.join_or_create(player_id.clone(), capacity, link).await?
            }
        };
        sessions.seat(player_id, room)?;
        Ok(room)
    }

    pub async fn choose_tile(&self, player_id: &PlayerId, tile_id: u32) -> Result<(), MagnificoError> {
        let rooms = self.rooms.lock().await;
        Ok(rooms.choose_tile(player_id.clone(), tile_id).await?)
    }

    pub async fn choose_leader(
        &self,
        player_id: &PlayerId,
        card: impl Into<String>,
    ) -> Result<(), MagnificoError> {
        let rooms = self.rooms.lock().await;
        Ok(rooms.choose_leader(player_id.clone(), card.into()).await?)
    }

    pub async fn submit_move(&self, player_id: &PlayerId, mv: Move) -> Result<(), MagnificoError> {
        let rooms = self.rooms.lock().await;
        Ok(rooms.submit_move(player_id.clone(), mv).await?)
    }

    /// Ends turn number `turn` (from `TurnStarted`) early.
    pub async fn end_turn(&self, player_id: &PlayerId, turn: u64) -> Result<(), MagnificoError> {
        let rooms = self.rooms.lock().await;
        Ok(rooms.end_turn(player_id.clone(), turn).await?)
    }

    /// Marks the player's link as gone. Their seat is kept; the room keeps
    /// running and their turns time out until they reconnect.
    pub async fn disconnect(&self, player_id: &PlayerId) -> Result<(), MagnificoError> {
        self.sessions.lock().await.disconnect(player_id)?;
        Ok(())
    }

    /// Re-attaches a disconnected player by reconnection token.
    ///
    /// If the player is still seated, the room replaces their link with
    /// `link` and re-sends anything they are expected to answer. Returns the
    /// player and, if any, their room.
    pub async fn reconnect(
        &self,
        token: &str,
        link: PlayerSender,
    ) -> Result<(PlayerId, Option<RoomId>), MagnificoError> {
        let mut sessions = self.sessions.lock().await;
        let session = sessions.reconnect(token)?;
        let player_id = session.player_id.clone();
        if session.room.is_none() {
            return Ok((player_id, None));
        }

        let mut rooms = self.rooms.lock().await;
        rooms.prune_finished();
        match rooms.rejoin(player_id.clone(), link).await {
            Ok(room) => Ok((player_id, Some(room))),
            // The session ended while they were away.
            Err(RoomError::NotSeated(_)) => {
                tracing::debug!(%player_id, "reconnected after room ended");
                Ok((player_id, None))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Expires sessions whose grace period elapsed and forgets them.
    ///
    /// Returns the expired players. Their seats are unaffected; a room runs
    /// to completion with or without them.
    pub async fn expire_stale(&self) -> Vec<PlayerId> {
        let mut sessions = self.sessions.lock().await;
        let expired = sessions.sweep();
        if !expired.is_empty() {
            tracing::info!(count = expired.len(), "stale sessions expired");
        }
        expired
    }

    /// Rooms still admitting players, newest first.
    pub async fn list_rooms(&self) -> Vec<RoomInfo> {
        self.rooms.lock().await.list_rooms().await
    }

    pub async fn room_info(&self, room_id: RoomId) -> Result<RoomInfo, MagnificoError> {
        Ok(self.rooms.lock().await.get_room_info(room_id).await?)
    }

    /// The room a player is seated in, if it is still running.
    pub async fn player_room(&self, player_id: &PlayerId) -> Option<RoomId> {
        let mut rooms = self.rooms.lock().await;
        rooms.prune_finished();
        rooms.player_room(player_id)
    }
}
