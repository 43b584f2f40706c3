//! Room actor: an isolated Tokio task that owns one session end to end.
//!
//! The actor gathers participants, closes, sets the session up, runs the
//! tile and leader drafts and then every turn. It is the only owner of
//! membership, pools, turn order and the session clock; the outside world
//! talks to it through a [`RoomHandle`].
//!
//! Whenever the session waits (for the start deadline, a draft answer or
//! the end of a turn) the actor keeps serving admissions, rejoins and
//! info requests from the same channel.

use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use magnifico_clock::{DeadlinePurpose, Expired, SessionClock};
use magnifico_model::{Catalog, Game, LeaderCard, PersonalTile};
use magnifico_protocol::{Move, PlayerId, Recipient, RoomId};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};

use crate::barrier::{DecisionBarrier, Signal};
use crate::draft::{RotatingDraft, SequentialDraft, duplicate_key};
use crate::onboarding::onboard;
use crate::setup::DeckSet;
use crate::turns::{TurnScheduler, TurnSlot};
use crate::{DeliveryError, GameSettings, RoomError, RoomState, RuleEngine, SetupError};

// ---------------------------------------------------------------------------
// Outbound events
// ---------------------------------------------------------------------------

/// An event sent from a room to a participant's link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum RoomEvent {
    /// Someone was admitted while the room gathers.
    PlayerJoined {
        player: PlayerId,
        players: usize,
        capacity: usize,
    },
    /// The room closed and everyone is seated, in turn order.
    SessionStarting { order: Vec<PlayerId> },
    /// The tile pool as it stands; answer with one tile id.
    TileOffer { tiles: Vec<PersonalTile> },
    /// One block of leader cards for draft round `round`; answer with
    /// one card name from it.
    LeaderOffer { round: u32, cards: Vec<LeaderCard> },
    /// The whole game after the board was dealt for a new sub-round.
    GameInfo { game: Game },
    /// `turn` numbers every turn of the session from 1; the holder echoes
    /// it to end the turn early.
    TurnStarted {
        turn: u64,
        player: PlayerId,
        round: u32,
        sub_round: u32,
        move_wait_ms: u64,
    },
    MoveApplied { player: PlayerId, mv: Move },
    TurnEnded { player: PlayerId, timed_out: bool },
    /// A decision from this participant was refused.
    Rejected { reason: String },
    SessionComplete,
    /// Setup failed; the room is shutting down.
    SessionAborted { reason: String },
}

/// Channel sender for delivering events to one participant.
pub type PlayerSender = mpsc::UnboundedSender<RoomEvent>;

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// A decision value submitted by a participant.
#[derive(Debug, Clone)]
pub(crate) enum Decision {
    Tile(u32),
    Leader(String),
    Move(Move),
    /// Carries the number of the turn being ended.
    EndTurn(u64),
}

impl Decision {
    fn label(&self) -> &'static str {
        match self {
            Self::Tile(_) => "tile choice",
            Self::Leader(_) => "leader choice",
            Self::Move(_) => "move",
            Self::EndTurn(_) => "end of turn",
        }
    }
}

pub(crate) enum RoomCommand {
    Admit {
        player_id: PlayerId,
        link: PlayerSender,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },
    /// Replace the link of a seated participant.
    Rejoin {
        player_id: PlayerId,
        link: PlayerSender,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },
    Decide {
        player_id: PlayerId,
        decision: Decision,
    },
    GetInfo {
        reply: oneshot::Sender<RoomInfo>,
    },
    Shutdown,
}

/// A snapshot of room metadata.
#[derive(Debug, Clone)]
pub struct RoomInfo {
    pub room_id: RoomId,
    pub state: RoomState,
    /// In admission order until the session starts, then in turn order.
    pub players: Vec<PlayerId>,
    pub capacity: usize,
    pub quorum: usize,
}

impl RoomInfo {
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn is_open(&self) -> bool {
        self.state.is_joinable()
    }
}

// ---------------------------------------------------------------------------
// Handle
// ---------------------------------------------------------------------------

/// Handle to a running room actor. Cheap to clone.
#[derive(Clone)]
pub struct RoomHandle {
    room_id: RoomId,
    sender: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    pub fn room_id(&self) -> RoomId {
        self.room_id
    }

    /// Returns `true` once the actor has stopped.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Admits a participant while the room is gathering.
    pub async fn admit(&self, player_id: PlayerId, link: PlayerSender) -> Result<(), RoomError> {
        self.request(|reply| RoomCommand::Admit {
            player_id,
            link,
            reply,
        })
        .await?
    }

    /// Re-attaches a seated participant through a new link. Their seat,
    /// tile, leader cards and resources are untouched.
    pub async fn rejoin(&self, player_id: PlayerId, link: PlayerSender) -> Result<(), RoomError> {
        self.request(|reply| RoomCommand::Rejoin {
            player_id,
            link,
            reply,
        })
        .await?
    }

    pub async fn choose_tile(&self, player_id: PlayerId, tile_id: u32) -> Result<(), RoomError> {
        self.decide(player_id, Decision::Tile(tile_id)).await
    }

    pub async fn choose_leader(
        &self,
        player_id: PlayerId,
        card: impl Into<String>,
    ) -> Result<(), RoomError> {
        self.decide(player_id, Decision::Leader(card.into())).await
    }

    pub async fn submit_move(&self, player_id: PlayerId, mv: Move) -> Result<(), RoomError> {
        self.decide(player_id, Decision::Move(mv)).await
    }

    /// Ends turn number `turn` early. Ignored unless the sender holds that
    /// turn and it is still running.
    pub async fn end_turn(&self, player_id: PlayerId, turn: u64) -> Result<(), RoomError> {
        self.decide(player_id, Decision::EndTurn(turn)).await
    }

    pub async fn get_info(&self) -> Result<RoomInfo, RoomError> {
        self.request(|reply| RoomCommand::GetInfo { reply }).await
    }

    pub async fn shutdown(&self) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Shutdown)
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))
    }

    async fn decide(&self, player_id: PlayerId, decision: Decision) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Decide {
                player_id,
                decision,
            })
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> RoomCommand,
    ) -> Result<T, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(command(reply_tx))
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))
    }
}

// ---------------------------------------------------------------------------
// Actor
// ---------------------------------------------------------------------------

struct Participant {
    id: PlayerId,
    link: PlayerSender,
}

/// What woke the actor up while the session was waiting.
enum Wake {
    Decision(PlayerId, Decision),
    Deadline(Expired),
}

/// Why the session stopped before completing.
enum Stop {
    /// Shutdown requested, or every handle dropped.
    Halted,
    Aborted(SetupError),
}

impl From<SetupError> for Stop {
    fn from(error: SetupError) -> Self {
        Self::Aborted(error)
    }
}

struct RoomActor<G: RuleEngine> {
    room_id: RoomId,
    settings: GameSettings,
    catalog: Arc<Catalog>,
    state: RoomState,
    participants: Vec<Participant>,
    clock: SessionClock,
    rng: StdRng,
    decks: DeckSet,
    game: Game,
    /// Draft offers still awaiting an answer, re-sent on rejoin.
    offers: BTreeMap<PlayerId, RoomEvent>,
    /// The `TurnStarted` of the running turn, re-sent on rejoin.
    turn_notice: Option<RoomEvent>,
    receiver: mpsc::Receiver<RoomCommand>,
    _rules: PhantomData<fn() -> G>,
}

impl<G: RuleEngine> RoomActor<G> {
    async fn run(mut self) {
        tracing::info!(
            room_id = %self.room_id,
            capacity = self.settings.max_players,
            quorum = self.settings.min_players,
            "room actor started"
        );

        match self.orchestrate().await {
            Ok(()) => {}
            Err(Stop::Halted) => {
                tracing::info!(room_id = %self.room_id, state = %self.state, "room shutting down");
            }
            Err(Stop::Aborted(error)) => self.abort(&error),
        }
        self.clock.cancel();

        let clock = self.clock.metrics();
        tracing::info!(
            room_id = %self.room_id,
            deadlines_fired = clock.fired,
            deadlines_cancelled = clock.cancelled,
            deadlines_replaced = clock.replaced,
            "room actor stopped"
        );
    }

    async fn orchestrate(&mut self) -> Result<(), Stop> {
        self.gather().await?;
        self.set_up()?;
        self.tile_draft().await?;
        self.leader_draft().await?;
        self.play().await
    }

    /// Waits for the next decision or deadline, serving admissions,
    /// rejoins and info requests in between.
    async fn wake(&mut self) -> Result<Wake, Stop> {
        loop {
            tokio::select! {
                cmd = self.receiver.recv() => match cmd {
                    None | Some(RoomCommand::Shutdown) => return Err(Stop::Halted),
                    Some(RoomCommand::Decide { player_id, decision }) => {
                        if self.is_member(&player_id) {
                            return Ok(Wake::Decision(player_id, decision));
                        }
                        tracing::warn!(
                            room_id = %self.room_id,
                            %player_id,
                            "decision from non-member, ignoring"
                        );
                    }
                    Some(other) => self.handle_control(other),
                },
                expired = self.clock.expired() => return Ok(Wake::Deadline(expired)),
            }
        }
    }

    fn handle_control(&mut self, cmd: RoomCommand) {
        match cmd {
            RoomCommand::Admit {
                player_id,
                link,
                reply,
            } => {
                let _ = reply.send(self.admit(player_id, link));
            }
            RoomCommand::Rejoin {
                player_id,
                link,
                reply,
            } => {
                let _ = reply.send(self.rejoin(player_id, link));
            }
            RoomCommand::GetInfo { reply } => {
                let _ = reply.send(self.info());
            }
            RoomCommand::Decide { .. } | RoomCommand::Shutdown => {}
        }
    }

    // -- Admission ----------------------------------------------------------

    fn admit(&mut self, player_id: PlayerId, link: PlayerSender) -> Result<(), RoomError> {
        if !self.state.is_joinable() {
            return Err(RoomError::RoomClosed(self.room_id));
        }
        if self.is_member(&player_id) {
            return Err(RoomError::AlreadyInRoom(player_id, self.room_id));
        }

        self.participants.push(Participant {
            id: player_id.clone(),
            link,
        });
        let players = self.participants.len();
        tracing::info!(room_id = %self.room_id, %player_id, players, "player admitted");
        self.broadcast(RoomEvent::PlayerJoined {
            player: player_id,
            players,
            capacity: self.settings.max_players,
        });

        if players == self.settings.max_players {
            self.close("capacity reached");
            self.clock.schedule(DeadlinePurpose::RoomStart, Duration::ZERO);
        } else if players == self.settings.min_players {
            self.clock
                .schedule(DeadlinePurpose::RoomStart, self.settings.pre_start_wait());
            tracing::info!(
                room_id = %self.room_id,
                wait_ms = self.settings.pre_start_wait_ms,
                "quorum reached, start countdown running"
            );
        }
        Ok(())
    }

    fn rejoin(&mut self, player_id: PlayerId, link: PlayerSender) -> Result<(), RoomError> {
        let participant = self
            .participants
            .iter_mut()
            .find(|p| p.id == player_id)
            .ok_or_else(|| RoomError::NotInRoom(player_id.clone(), self.room_id))?;
        participant.link = link;
        tracing::info!(room_id = %self.room_id, %player_id, state = %self.state, "player rejoined");

        if let Some(offer) = self.offers.get(&player_id).cloned() {
            let _ = self.send_to(&player_id, offer);
        }
        if self.state == RoomState::InProgress {
            let _ = self.send_to(
                &player_id,
                RoomEvent::GameInfo {
                    game: self.game.clone(),
                },
            );
            if let Some(notice) = self.turn_notice.clone() {
                let _ = self.send_to(&player_id, notice);
            }
        }
        Ok(())
    }

    async fn gather(&mut self) -> Result<(), Stop> {
        loop {
            match self.wake().await? {
                Wake::Deadline(expired) if expired.purpose == DeadlinePurpose::RoomStart => {
                    self.close("start deadline fired");
                    return Ok(());
                }
                Wake::Deadline(_) => {}
                Wake::Decision(player_id, decision) => self.out_of_phase(&player_id, decision),
            }
        }
    }

    /// Stops admissions. Only the first trigger has any effect.
    fn close(&mut self, trigger: &str) {
        if self.state.is_joinable() {
            self.enter(RoomState::Starting);
            tracing::info!(
                room_id = %self.room_id,
                players = self.participants.len(),
                trigger,
                "room closed"
            );
        }
    }

    // -- Setup --------------------------------------------------------------

    fn set_up(&mut self) -> Result<(), SetupError> {
        let players: Vec<PlayerId> = self.participants.iter().map(|p| p.id.clone()).collect();

        let tiles = self.catalog.personal_tiles.len();
        if tiles < players.len() {
            return Err(SetupError::InsufficientTiles {
                available: tiles,
                needed: players.len(),
            });
        }
        let leaders = self.catalog.leader_cards.len();
        let needed = players.len() * self.settings.leader_cards_per_player;
        if leaders < needed {
            return Err(SetupError::InsufficientLeaders {
                available: leaders,
                needed,
            });
        }

        if let Some(id) = duplicate_key(&self.catalog.personal_tiles) {
            return Err(SetupError::DuplicateKey {
                kind: "personal tile",
                key: id.to_string(),
            });
        }
        if let Some(name) = duplicate_key(&self.catalog.leader_cards) {
            return Err(SetupError::DuplicateKey {
                kind: "leader card",
                key: name,
            });
        }

        self.decks = DeckSet::build(self.catalog.development_cards.iter().cloned(), &mut self.rng);
        self.decks
            .validate(self.settings.rounds, self.settings.sub_rounds)?;
        self.game = onboard(&players, self.settings.starting_resources, &mut self.rng)?;

        tracing::info!(room_id = %self.room_id, order = ?self.game.order, "players onboarded");
        self.broadcast(RoomEvent::SessionStarting {
            order: self.game.order.clone(),
        });
        Ok(())
    }

    fn abort(&mut self, error: &SetupError) {
        tracing::error!(room_id = %self.room_id, %error, "session aborted");
        self.enter(RoomState::Aborted);
        self.broadcast(RoomEvent::SessionAborted {
            reason: error.to_string(),
        });
    }

    // -- Drafts -------------------------------------------------------------

    fn arm_draft_deadline(&mut self) {
        match self.settings.draft_wait() {
            Some(wait) => {
                self.clock.schedule(DeadlinePurpose::DraftAnswer, wait);
            }
            None => {
                self.clock.cancel();
            }
        }
    }

    async fn tile_draft(&mut self) -> Result<(), Stop> {
        self.enter(RoomState::TileDraft);
        let mut draft = SequentialDraft::new(self.catalog.personal_tiles.clone(), &self.game.order);

        while let Some(picker) = draft.next_picker() {
            let offer = RoomEvent::TileOffer {
                tiles: draft.pool().to_vec(),
            };
            if self.send_to(&picker, offer.clone()).is_err() {
                continue;
            }
            self.offers.insert(picker.clone(), offer);
            let mut barrier = DecisionBarrier::new([picker.clone()]);
            self.arm_draft_deadline();

            while !barrier.is_complete() {
                match self.wake().await? {
                    Wake::Decision(player_id, Decision::Tile(tile_id)) => {
                        if !barrier.is_waiting_for(&player_id) {
                            self.reject(&player_id, "it is not your turn to pick a tile");
                        } else if !draft.contains(&tile_id) {
                            self.reject(&player_id, format!("tile {tile_id} is not on offer"));
                        } else {
                            barrier.signal(&player_id, tile_id);
                        }
                    }
                    Wake::Decision(player_id, decision) => self.out_of_phase(&player_id, decision),
                    Wake::Deadline(expired) if expired.purpose == DeadlinePurpose::DraftAnswer => {
                        tracing::warn!(
                            room_id = %self.room_id,
                            player_id = %picker,
                            "tile offer timed out, player keeps no tile"
                        );
                        barrier.forfeit(&picker);
                    }
                    Wake::Deadline(_) => {}
                }
            }

            self.clock.cancel_if(DeadlinePurpose::DraftAnswer);
            self.offers.remove(&picker);
            if let Some(tile) = barrier.decision(&picker).and_then(|id| draft.claim(id)) {
                tracing::info!(room_id = %self.room_id, player_id = %picker, tile_id = tile.id, "tile claimed");
                if let Some(board) = self.game.board_of_mut(&picker) {
                    board.tile = Some(tile);
                }
            }
        }
        Ok(())
    }

    async fn leader_draft(&mut self) -> Result<(), Stop> {
        self.enter(RoomState::LeaderDraft);
        let mut draft = RotatingDraft::new(
            self.catalog.leader_cards.clone(),
            &self.game.order,
            self.settings.leader_cards_per_player,
            &mut self.rng,
        );

        let mut round = 0;
        while !draft.is_finished() {
            round += 1;
            let blocks: BTreeMap<PlayerId, Vec<LeaderCard>> = draft.offers().into_iter().collect();
            for (player, cards) in &blocks {
                let offer = RoomEvent::LeaderOffer {
                    round,
                    cards: cards.clone(),
                };
                // An unreachable participant stays in the round; the
                // offer is re-sent if they rejoin.
                let _ = self.send_to(player, offer.clone());
                self.offers.insert(player.clone(), offer);
            }
            let mut barrier = DecisionBarrier::new(draft.order().cloned());
            self.arm_draft_deadline();

            while !barrier.is_complete() {
                match self.wake().await? {
                    Wake::Decision(player_id, Decision::Leader(name)) => {
                        let offered = blocks
                            .get(&player_id)
                            .is_some_and(|block| block.iter().any(|card| card.name == name));
                        if !offered {
                            self.reject(&player_id, format!("{name} is not in your offer"));
                            continue;
                        }
                        match barrier.signal(&player_id, name) {
                            Signal::Accepted => {
                                self.offers.remove(&player_id);
                            }
                            Signal::Duplicate => {
                                self.reject(&player_id, "you already picked this round");
                            }
                            Signal::Unexpected => {
                                self.reject(&player_id, "you are not part of this draft round");
                            }
                        }
                    }
                    Wake::Decision(player_id, decision) => self.out_of_phase(&player_id, decision),
                    Wake::Deadline(expired) if expired.purpose == DeadlinePurpose::DraftAnswer => {
                        let late: Vec<PlayerId> = barrier.outstanding().cloned().collect();
                        for player in late {
                            match blocks.get(&player).and_then(|block| block.first()) {
                                Some(card) => {
                                    tracing::warn!(
                                        room_id = %self.room_id,
                                        player_id = %player,
                                        card = %card.name,
                                        "leader offer timed out, picking first card"
                                    );
                                    barrier.signal(&player, card.name.clone());
                                }
                                None => {
                                    barrier.forfeit(&player);
                                }
                            }
                            self.offers.remove(&player);
                        }
                    }
                    Wake::Deadline(_) => {}
                }
            }

            self.clock.cancel_if(DeadlinePurpose::DraftAnswer);
            let forfeited: Vec<&PlayerId> = barrier.forfeited().collect();
            if !forfeited.is_empty() {
                tracing::warn!(room_id = %self.room_id, round, ?forfeited, "leader picks lost");
            }
            for (player, card) in draft.finish_round(&barrier.into_decisions()) {
                tracing::debug!(room_id = %self.room_id, player_id = %player, card = %card.name, round, "leader card claimed");
                if let Some(board) = self.game.board_of_mut(&player) {
                    board.leader_cards.push(card);
                }
            }
            self.offers.clear();
        }

        tracing::info!(room_id = %self.room_id, rounds = round, "leader draft complete");
        Ok(())
    }

    // -- Turns --------------------------------------------------------------

    async fn play(&mut self) -> Result<(), Stop> {
        self.enter(RoomState::InProgress);
        let mut turns = TurnScheduler::new(
            self.settings.rounds,
            self.settings.sub_rounds,
            self.game.order.len(),
        );

        for (turn, slot) in (1..).zip(turns.by_ref()) {
            if slot.opens_sub_round() {
                self.open_sub_round(slot.round, slot.sub_round)?;
            }
            let Some(player) = self.game.order.get(slot.player_index).cloned() else {
                continue;
            };
            self.play_turn(player, slot, turn).await?;
        }

        self.enter(RoomState::Finished);
        tracing::info!(room_id = %self.room_id, turns = turns.total_turns(), "session complete");
        self.broadcast(RoomEvent::SessionComplete);
        Ok(())
    }

    /// Deals the board, rolls the dice and shows everyone the result.
    fn open_sub_round(&mut self, round: u32, sub_round: u32) -> Result<(), SetupError> {
        self.game.round = round;
        self.game.sub_round = sub_round;
        self.decks.deal(&mut self.game.board, round, sub_round)?;
        self.game.roll_dice(&mut self.rng);
        G::on_sub_round_start(&mut self.game);

        tracing::debug!(room_id = %self.room_id, round, sub_round, dice = ?self.game.dice, "sub-round opened");
        self.broadcast(RoomEvent::GameInfo {
            game: self.game.clone(),
        });
        Ok(())
    }

    async fn play_turn(&mut self, player: PlayerId, slot: TurnSlot, turn: u64) -> Result<(), Stop> {
        G::on_turn_start(&mut self.game, &player);
        let notice = RoomEvent::TurnStarted {
            turn,
            player: player.clone(),
            round: slot.round,
            sub_round: slot.sub_round,
            move_wait_ms: self.settings.move_wait_ms,
        };
        self.broadcast(notice.clone());
        self.turn_notice = Some(notice);
        self.clock
            .schedule(DeadlinePurpose::MoveTimeout, self.settings.move_wait());

        let timed_out = loop {
            match self.wake().await? {
                Wake::Decision(sender, Decision::EndTurn(ended)) => {
                    if sender == player && ended == turn {
                        self.clock.cancel_if(DeadlinePurpose::MoveTimeout);
                        break false;
                    }
                    tracing::debug!(
                        room_id = %self.room_id,
                        %sender,
                        turn,
                        ended,
                        "end turn for another holder or turn ignored"
                    );
                }
                Wake::Decision(sender, Decision::Move(mv)) => self.handle_move(&sender, &player, mv),
                Wake::Decision(sender, decision) => self.out_of_phase(&sender, decision),
                Wake::Deadline(expired) if expired.purpose == DeadlinePurpose::MoveTimeout => {
                    tracing::info!(
                        room_id = %self.room_id,
                        player_id = %player,
                        turn,
                        generation = expired.generation,
                        late_ms = expired.late_by.as_millis() as u64,
                        "turn timed out"
                    );
                    break true;
                }
                Wake::Deadline(_) => {}
            }
        };

        self.turn_notice = None;
        self.broadcast(RoomEvent::TurnEnded { player, timed_out });
        Ok(())
    }

    fn handle_move(&mut self, sender: &PlayerId, holder: &PlayerId, mv: Move) {
        if sender != holder {
            self.reject(sender, "it is not your turn");
            return;
        }
        if let Err(reason) = G::validate_move(&self.game, sender, &mv) {
            tracing::debug!(room_id = %self.room_id, %sender, %reason, "move rejected");
            self.reject(sender, reason);
            return;
        }
        G::apply_move(&mut self.game, sender, &mv);
        self.broadcast(RoomEvent::MoveApplied {
            player: sender.clone(),
            mv,
        });
    }

    // -- Helpers ------------------------------------------------------------

    fn out_of_phase(&self, player_id: &PlayerId, decision: Decision) {
        if let Decision::EndTurn(_) = decision {
            return;
        }
        tracing::debug!(
            room_id = %self.room_id,
            %player_id,
            state = %self.state,
            decision = decision.label(),
            "decision out of phase"
        );
        self.reject(
            player_id,
            format!("no {} expected while {}", decision.label(), self.state),
        );
    }

    fn enter(&mut self, next: RoomState) {
        if !self.state.can_transition_to(next) {
            tracing::warn!(room_id = %self.room_id, from = %self.state, to = %next, "unexpected state transition");
        }
        tracing::debug!(room_id = %self.room_id, from = %self.state, to = %next, "room state changed");
        self.state = next;
    }

    fn is_member(&self, player_id: &PlayerId) -> bool {
        self.participants.iter().any(|p| &p.id == player_id)
    }

    fn reject(&self, player_id: &PlayerId, reason: impl Into<String>) {
        self.dispatch(
            Recipient::Player(player_id.clone()),
            RoomEvent::Rejected {
                reason: reason.into(),
            },
        );
    }

    fn broadcast(&self, event: RoomEvent) {
        self.dispatch(Recipient::All, event);
    }

    /// Sends `event` to every addressed participant. Failures are logged
    /// and skipped.
    fn dispatch(&self, recipient: Recipient, event: RoomEvent) {
        for participant in &self.participants {
            if recipient.includes(&participant.id) {
                let _ = self.send_to(&participant.id, event.clone());
            }
        }
    }

    fn send_to(&self, player_id: &PlayerId, event: RoomEvent) -> Result<(), DeliveryError> {
        let delivered = self
            .participants
            .iter()
            .find(|p| &p.id == player_id)
            .is_some_and(|p| p.link.send(event).is_ok());
        if delivered {
            return Ok(());
        }
        let error = DeliveryError::Unreachable(player_id.clone());
        tracing::warn!(room_id = %self.room_id, %error, "delivery failed");
        Err(error)
    }

    fn info(&self) -> RoomInfo {
        let players = if self.game.order.is_empty() {
            self.participants.iter().map(|p| p.id.clone()).collect()
        } else {
            self.game.order.clone()
        };
        RoomInfo {
            room_id: self.room_id,
            state: self.state,
            players,
            capacity: self.settings.max_players,
            quorum: self.settings.min_players,
        }
    }
}

/// Spawns a room actor and returns a handle to it.
///
/// `channel_size` bounds the command queue; senders wait when it is full.
pub(crate) fn spawn_room<G: RuleEngine>(
    room_id: RoomId,
    settings: GameSettings,
    catalog: Arc<Catalog>,
    channel_size: usize,
) -> RoomHandle {
    let settings = settings.validated();
    let rng = match settings.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    };
    let (tx, rx) = mpsc::channel(channel_size);

    let actor = RoomActor::<G> {
        room_id,
        settings,
        catalog,
        state: RoomState::Gathering,
        participants: Vec::new(),
        clock: SessionClock::new(),
        rng,
        decks: DeckSet::default(),
        game: Game::default(),
        offers: BTreeMap::new(),
        turn_notice: None,
        receiver: rx,
        _rules: PhantomData,
    };

    tokio::spawn(actor.run());

    RoomHandle {
        room_id,
        sender: tx,
    }
}
