//! Session settings and the room state machine.

use std::time::Duration;

use magnifico_model::{PlayerColor, Resources};
use serde::{Deserialize, Serialize};

/// Smallest capacity and quorum a room accepts.
pub const MIN_PLAYERS: usize = 2;

// ---------------------------------------------------------------------------
// GameSettings
// ---------------------------------------------------------------------------

/// Settings for one room. Fixed once the room is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameSettings {
    /// Quorum: reaching it starts the pre-start countdown.
    pub min_players: usize,

    /// Capacity: reaching it closes the room and starts at once.
    pub max_players: usize,

    /// Countdown between reaching quorum and starting.
    pub pre_start_wait_ms: u64,

    /// Time a turn-holder has before the turn is forced to end.
    pub move_wait_ms: u64,

    /// Time a draft participant has to answer an offer. `None` waits
    /// indefinitely.
    pub draft_wait_ms: Option<u64>,

    /// Number of rounds (eras).
    pub rounds: u32,

    /// Sub-rounds per round.
    pub sub_rounds: u32,

    /// Leader cards each participant ends the leader draft with.
    pub leader_cards_per_player: usize,

    /// Resource bundle every participant starts with. The participant at
    /// seat `i` receives `i` extra coins on top.
    pub starting_resources: Resources,

    /// Seed for shuffles and dice. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            min_players: 2,
            max_players: PlayerColor::ALL.len(),
            pre_start_wait_ms: 10_000,
            move_wait_ms: 60_000,
            draft_wait_ms: Some(60_000),
            rounds: 3,
            sub_rounds: 2,
            leader_cards_per_player: 4,
            starting_resources: Resources::starting_bundle(),
            seed: None,
        }
    }
}

impl GameSettings {
    /// Returns a copy with every field brought into a usable range.
    ///
    /// Capacity is capped by the number of player colors and never drops
    /// below [`MIN_PLAYERS`]; quorum is kept between [`MIN_PLAYERS`] and
    /// capacity.
    pub fn validated(mut self) -> Self {
        self.max_players = self.max_players.clamp(MIN_PLAYERS, PlayerColor::ALL.len());
        self.min_players = self.min_players.clamp(MIN_PLAYERS, self.max_players);
        self
    }

    /// The same settings with a different capacity, clamped.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.max_players = capacity;
        self.validated()
    }

    pub fn pre_start_wait(&self) -> Duration {
        Duration::from_millis(self.pre_start_wait_ms)
    }

    pub fn move_wait(&self) -> Duration {
        Duration::from_millis(self.move_wait_ms)
    }

    pub fn draft_wait(&self) -> Option<Duration> {
        self.draft_wait_ms.map(Duration::from_millis)
    }
}

// ---------------------------------------------------------------------------
// RoomState
// ---------------------------------------------------------------------------

/// The lifecycle state of a room.
///
/// ```text
/// Gathering → Starting → TileDraft → LeaderDraft → InProgress → Finished
///                 │           │            │             │
///                 └───────────┴────────────┴─────────────┴──→ Aborted
/// ```
///
/// Only `Gathering` admits new participants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomState {
    Gathering,
    Starting,
    TileDraft,
    LeaderDraft,
    InProgress,
    Finished,
    Aborted,
}

impl RoomState {
    pub fn is_joinable(&self) -> bool {
        matches!(self, Self::Gathering)
    }

    /// Returns `true` once the room has closed and until the session ends.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            Self::Starting | Self::TileDraft | Self::LeaderDraft | Self::InProgress
        )
    }

    /// The next state on the normal path, or `None` from a terminal state.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Gathering => Some(Self::Starting),
            Self::Starting => Some(Self::TileDraft),
            Self::TileDraft => Some(Self::LeaderDraft),
            Self::LeaderDraft => Some(Self::InProgress),
            Self::InProgress => Some(Self::Finished),
            Self::Finished | Self::Aborted => None,
        }
    }

    /// Returns `true` if moving to `target` is allowed from here.
    pub fn can_transition_to(self, target: Self) -> bool {
        self.next() == Some(target) || (target == Self::Aborted && self.is_active())
    }
}

impl std::fmt::Display for RoomState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gathering => write!(f, "Gathering"),
            Self::Starting => write!(f, "Starting"),
            Self::TileDraft => write!(f, "TileDraft"),
            Self::LeaderDraft => write!(f, "LeaderDraft"),
            Self::InProgress => write!(f, "InProgress"),
            Self::Finished => write!(f, "Finished"),
            Self::Aborted => write!(f, "Aborted"),
        }
    }
}
