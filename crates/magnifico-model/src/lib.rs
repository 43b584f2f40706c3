//! Board and player data model for Magnifico.
//!
//! This is the rule engine's side of the contract: the cards and tiles a
//! session draws from, the shared board the orchestrator deals onto, the
//! dice, and each player's personal board and resource ledger. It carries
//! no rules of its own beyond simple bookkeeping.

mod board;
mod cards;
mod error;
mod game;
mod player;
mod resources;

pub use board::{BOARD_COLUMNS, Board, CARDS_PER_COLUMN, Dice};
pub use cards::{CardColor, Catalog, DevelopmentCard, LeaderCard, PersonalTile};
pub use error::ModelError;
pub use game::Game;
pub use player::{FamilyMembers, PersonalBoard, PlayerColor};
pub use resources::{ResourceKind, Resources};
