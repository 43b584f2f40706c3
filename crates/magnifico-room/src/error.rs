//! Error types for the room layer.

use magnifico_model::{CardColor, ModelError};
use magnifico_protocol::{PlayerId, RoomId};

/// Errors returned to callers of a room or the room manager.
///
/// None of these are fatal to the room itself.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    #[error("room {0} not found")]
    NotFound(RoomId),

    /// The room already closed (full or started) and admits no one.
    #[error("room {0} is closed")]
    RoomClosed(RoomId),

    #[error("player {0} already in room {1}")]
    AlreadyInRoom(PlayerId, RoomId),

    #[error("player {0} not in room {1}")]
    NotInRoom(PlayerId, RoomId),

    /// The player is seated in some room and cannot join another.
    #[error("player {0} is already seated in room {1}")]
    AlreadySeated(PlayerId, RoomId),

    /// The player is not seated in any room.
    #[error("player {0} is not in any room")]
    NotSeated(PlayerId),

    /// The room's actor stopped or its command channel is closed.
    #[error("room {0} is unavailable")]
    Unavailable(RoomId),
}

/// Fatal errors while preparing a session. The room broadcasts
/// `SessionAborted` and stops.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error(
        "not enough {color} cards for round {round} sub-round {sub_round}: \
         have {available}, need {needed}"
    )]
    InsufficientCards {
        color: CardColor,
        round: u32,
        sub_round: u32,
        available: usize,
        needed: usize,
    },

    #[error("not enough personal tiles: have {available}, need {needed}")]
    InsufficientTiles { available: usize, needed: usize },

    #[error("not enough leader cards: have {available}, need {needed}")]
    InsufficientLeaders { available: usize, needed: usize },

    /// Two tiles share an id, or two leader cards share a name.
    #[error("duplicate {kind} {key} in the catalog")]
    DuplicateKey { kind: &'static str, key: String },

    #[error("{players} players but only {colors} player colors")]
    TooManyPlayers { players: usize, colors: usize },

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// A participant's outbound link is gone.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("player {0} is unreachable")]
    Unreachable(PlayerId),
}
