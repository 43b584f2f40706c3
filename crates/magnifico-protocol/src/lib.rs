//! Shared vocabulary for Magnifico.
//!
//! - **Identity** ([`PlayerId`], [`RoomId`]) — who is playing, and where.
//! - **Addressing** ([`Recipient`]) — who an outbound event is for.
//! - **Moves** ([`Move`], [`ActionArea`], [`FamilyMemberColor`]) — what a
//!   turn-holder may ask the rule engine to do.
//!
//! This crate has no knowledge of rooms, timers, or transports. Every
//! other crate in the workspace builds on it.

mod types;

pub use types::{ActionArea, FamilyMemberColor, Move, PlayerId, Recipient, RoomId};
