//! Core types shared by every Magnifico layer.
//!
//! These are the values that cross the boundary between a player's
//! connection and the room that orchestrates their game: who a player is,
//! which room they are in, who a message is addressed to, and what a
//! player can ask to do on their turn.

use serde::{Deserialize, Serialize};

use std::fmt;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A player's stable identity.
///
/// The account service hands out one username per player. That username is
/// the only key used to match an admission or a reconnection, so it is
/// wrapped in a newtype to keep it from being confused with any other
/// string (room names, card names, tokens).
///
/// `#[serde(transparent)]` keeps the JSON form a plain string, which also
/// lets `PlayerId` be used as a map key in serialized snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl PlayerId {
    /// Creates a player identity from anything string-like.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the username as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// A unique identifier for a room (one game instance).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub u64);

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Recipient
// ---------------------------------------------------------------------------

/// Who should receive an outbound event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recipient {
    /// Every participant in the room.
    All,

    /// One specific participant.
    Player(PlayerId),

    /// Everyone except the given participant.
    AllExcept(PlayerId),
}

impl Recipient {
    /// Returns `true` if `player` is addressed by this recipient.
    pub fn includes(&self, player: &PlayerId) -> bool {
        match self {
            Self::All => true,
            Self::Player(p) => p == player,
            Self::AllExcept(p) => p != player,
        }
    }
}

// ---------------------------------------------------------------------------
// Move vocabulary
// ---------------------------------------------------------------------------

/// The four family members a player places on the board.
///
/// Three of them take their strength from the dice of the same color;
/// the neutral member always starts at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FamilyMemberColor {
    Black,
    White,
    Orange,
    Neutral,
}

impl FamilyMemberColor {
    /// All family members, in board order.
    pub const ALL: [Self; 4] = [Self::Black, Self::White, Self::Orange, Self::Neutral];
}

impl fmt::Display for FamilyMemberColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Black => "black",
            Self::White => "white",
            Self::Orange => "orange",
            Self::Neutral => "neutral",
        };
        f.write_str(name)
    }
}

/// Where on the shared board a family member is placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "area")]
pub enum ActionArea {
    /// A floor of one of the four card towers.
    Tower { tower: usize, floor: usize },
    /// The council palace.
    Council,
    /// One of the market slots.
    Market { slot: usize },
    /// The harvest area; `extended` is the crowded second slot.
    Harvest { extended: bool },
    /// The production area; `extended` is the crowded second slot.
    Production { extended: bool },
}

/// An action a player submits while holding the turn.
///
/// The room only checks that the sender holds the turn; everything else
/// is decided by the rule engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Move {
    /// Place a family member, optionally boosting it with servants.
    PlaceFamilyMember {
        member: FamilyMemberColor,
        servants: u32,
        area: ActionArea,
    },
    /// Activate one of the player's leader cards.
    ActivateLeader { index: usize, servants: u32 },
    /// Discard one of the player's leader cards.
    DiscardLeader { index: usize },
}
