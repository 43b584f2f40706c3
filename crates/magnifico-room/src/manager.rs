//! Room manager: creates rooms, seats players and routes their decisions.
//!
//! The manager is a plain struct; the server owns it behind a mutex. Each
//! room runs as its own actor, so the manager only keeps handles and the
//! player → room index.

use std::collections::{BTreeMap, HashMap};
use std::marker::PhantomData;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use magnifico_model::Catalog;
use magnifico_protocol::{Move, PlayerId, RoomId};

use crate::room::spawn_room;
use crate::{GameSettings, PlayerSender, RoomError, RoomHandle, RoomInfo, RuleEngine};

/// Global counter for room ids. Ids only grow, so the highest id is the
/// newest room.
static NEXT_ROOM_ID: AtomicU64 = AtomicU64::new(1);

/// Bound of each room's command queue.
const DEFAULT_CHANNEL_SIZE: usize = 64;

/// Owns every room and knows where each player is seated.
pub struct RoomManager<G: RuleEngine> {
    rooms: BTreeMap<RoomId, RoomHandle>,
    player_rooms: HashMap<PlayerId, RoomId>,
    catalog: Arc<Catalog>,
    /// Settings for rooms created by [`join_or_create`](Self::join_or_create).
    defaults: GameSettings,
    _rules: PhantomData<fn() -> G>,
}

impl<G: RuleEngine> RoomManager<G> {
    pub fn new(catalog: Arc<Catalog>, defaults: GameSettings) -> Self {
        Self {
            rooms: BTreeMap::new(),
            player_rooms: HashMap::new(),
            catalog,
            defaults: defaults.validated(),
            _rules: PhantomData,
        }
    }

    /// Spawns a new gathering room.
    pub fn create_room(&mut self, settings: GameSettings) -> RoomId {
        let room_id = RoomId(NEXT_ROOM_ID.fetch_add(1, Ordering::Relaxed));
        let handle = spawn_room::<G>(
            room_id,
            settings,
            Arc::clone(&self.catalog),
            DEFAULT_CHANNEL_SIZE,
        );
        self.rooms.insert(room_id, handle);
        tracing::info!(%room_id, "room created");
        room_id
    }

    /// Admits a player into a specific room.
    pub async fn admit(
        &mut self,
        player_id: PlayerId,
        room_id: RoomId,
        link: PlayerSender,
    ) -> Result<(), RoomError> {
        if let Some(current) = self.player_rooms.get(&player_id) {
            if *current == room_id {
                return Err(RoomError::AlreadyInRoom(player_id, room_id));
            }
            return Err(RoomError::AlreadySeated(player_id, *current));
        }

        let handle = self
            .rooms
            .get(&room_id)
            .ok_or(RoomError::NotFound(room_id))?;
        handle.admit(player_id.clone(), link).await?;
        self.player_rooms.insert(player_id, room_id);
        Ok(())
    }

    /// Seats a player in the newest open room, or in a new room if none
    /// accepts them.
    ///
    /// A new room takes its capacity from `capacity` (the first
    /// participant's request), clamped to the supported range.
    pub async fn join_or_create(
        &mut self,
        player_id: PlayerId,
        capacity: Option<usize>,
        link: PlayerSender,
    ) -> Result<RoomId, RoomError> {
        self.prune_finished();
        if let Some(current) = self.player_rooms.get(&player_id) {
            return Err(RoomError::AlreadySeated(player_id, *current));
        }

        for (room_id, handle) in self.rooms.iter().rev() {
            match handle.get_info().await {
                Ok(info) if info.is_open() => {}
                _ => continue,
            }
            match handle.admit(player_id.clone(), link.clone()).await {
                Ok(()) => {
                    self.player_rooms.insert(player_id, *room_id);
                    return Ok(*room_id);
                }
                // Closed between the info request and the admission.
                Err(RoomError::RoomClosed(_) | RoomError::Unavailable(_)) => continue,
                Err(e) => return Err(e),
            }
        }

        let settings = match capacity {
            Some(capacity) => self.defaults.clone().with_capacity(capacity),
            None => self.defaults.clone(),
        };
        let room_id = self.create_room(settings);
        self.admit(player_id, room_id, link).await?;
        Ok(room_id)
    }

    /// Re-attaches a seated player through a new link.
    pub async fn rejoin(&self, player_id: PlayerId, link: PlayerSender) -> Result<RoomId, RoomError> {
        let handle = self.handle_for(&player_id)?;
        handle.rejoin(player_id, link).await?;
        Ok(handle.room_id())
    }

    pub async fn choose_tile(&self, player_id: PlayerId, tile_id: u32) -> Result<(), RoomError> {
        self.handle_for(&player_id)?
            .choose_tile(player_id, tile_id)
            .await
    }

    pub async fn choose_leader(&self, player_id: PlayerId, card: String) -> Result<(), RoomError> {
        self.handle_for(&player_id)?
            .choose_leader(player_id, card)
            .await
    }

    pub async fn submit_move(&self, player_id: PlayerId, mv: Move) -> Result<(), RoomError> {
        self.handle_for(&player_id)?.submit_move(player_id, mv).await
    }

    pub async fn end_turn(&self, player_id: PlayerId, turn: u64) -> Result<(), RoomError> {
        self.handle_for(&player_id)?.end_turn(player_id, turn).await
    }

    pub async fn get_room_info(&self, room_id: RoomId) -> Result<RoomInfo, RoomError> {
        self.rooms
            .get(&room_id)
            .ok_or(RoomError::NotFound(room_id))?
            .get_info()
            .await
    }

    /// Info for every room still admitting players, newest first.
    pub async fn list_rooms(&mut self) -> Vec<RoomInfo> {
        self.prune_finished();
        let mut infos = Vec::new();
        for handle in self.rooms.values().rev() {
            if let Ok(info) = handle.get_info().await {
                if info.is_open() {
                    infos.push(info);
                }
            }
        }
        infos
    }

    /// Forgets rooms whose actor has stopped and unseats their players.
    ///
    /// Returns the ids of the removed rooms.
    pub fn prune_finished(&mut self) -> Vec<RoomId> {
        let stopped: Vec<RoomId> = self
            .rooms
            .iter()
            .filter(|(_, handle)| handle.is_closed())
            .map(|(room_id, _)| *room_id)
            .collect();
        for room_id in &stopped {
            self.rooms.remove(room_id);
            tracing::debug!(%room_id, "stopped room pruned");
        }
        if !stopped.is_empty() {
            self.player_rooms
                .retain(|_, room_id| !stopped.contains(room_id));
        }
        stopped
    }

    /// Shuts a room down and unseats its players.
    pub async fn destroy_room(&mut self, room_id: RoomId) -> Result<(), RoomError> {
        let handle = self
            .rooms
            .remove(&room_id)
            .ok_or(RoomError::NotFound(room_id))?;

        // The actor may already have stopped on its own.
        let _ = handle.shutdown().await;
        self.player_rooms.retain(|_, rid| *rid != room_id);

        tracing::info!(%room_id, "room destroyed");
        Ok(())
    }

    pub fn player_room(&self, player_id: &PlayerId) -> Option<RoomId> {
        self.player_rooms.get(player_id).copied()
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    fn handle_for(&self, player_id: &PlayerId) -> Result<&RoomHandle, RoomError> {
        let room_id = self
            .player_rooms
            .get(player_id)
            .ok_or_else(|| RoomError::NotSeated(player_id.clone()))?;
        self.rooms.get(room_id).ok_or(RoomError::NotFound(*room_id))
    }
}
