//! Login registry and reconnection for Magnifico.
//!
//! A username may hold one live session at a time. When a player's link
//! drops, the session enters a grace period; presenting the reconnection
//! token issued at login within that period re-attaches the player to the
//! room they were seated in.
//!
//! ```text
//! Room layer (above)     ← rejoin() on reconnect
//!     ↕
//! Session layer (here)   ← who is logged in, which room they sit in
//!     ↕
//! Protocol layer (below) ← PlayerId, RoomId
//! ```

#![allow(async_fn_in_trait)]

mod auth;
mod error;
mod manager;
mod session;

pub use auth::{Authenticator, UsernameAuthenticator};
pub use error::SessionError;
pub use manager::SessionManager;
pub use session::{Session, SessionConfig, SessionState};
