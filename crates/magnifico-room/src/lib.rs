//! Room lifecycle and session orchestration for Magnifico.
//!
//! Each room runs as an isolated Tokio task (actor model) that owns its
//! participants, its session clock and, once closed, the whole session:
//! setup, the tile draft, the leader draft and every turn.
//!
//! # Key types
//!
//! - [`RoomManager`]: creates rooms, seats players, routes decisions
//! - [`RoomHandle`]: send commands to a running room actor
//! - [`RoomEvent`]: what a room sends to each participant
//! - [`RuleEngine`]: the game rules a room applies moves with
//! - [`GameSettings`]: quorum, capacity, waits and session length
//! - [`DeckSet`], [`SequentialDraft`], [`RotatingDraft`],
//!   [`DecisionBarrier`], [`TurnScheduler`]: the pieces a room is built from

mod barrier;
mod config;
mod draft;
mod error;
mod manager;
mod onboarding;
mod room;
mod rules;
mod setup;
mod turns;

pub use barrier::{DecisionBarrier, Signal};
pub use config::{GameSettings, MIN_PLAYERS, RoomState};
pub use draft::{DraftItem, RotatingDraft, SequentialDraft, duplicate_key};
pub use error::{DeliveryError, RoomError, SetupError};
pub use manager::RoomManager;
pub use onboarding::onboard;
pub use room::{PlayerSender, RoomEvent, RoomHandle, RoomInfo};
pub use rules::{BasicRules, RuleEngine};
pub use setup::DeckSet;
pub use turns::{TurnScheduler, TurnSlot};
