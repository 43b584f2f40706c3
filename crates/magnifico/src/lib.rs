//! # Magnifico
//!
//! Server-side session orchestration for Lorenzo il Magnifico.
//!
//! Players log in, are seated in the newest open room and, once the room
//! closes, play through the tile draft, the leader draft and every turn of
//! the session. Each room runs as its own Tokio task; [`GameServer`] ties
//! logins, rooms and reconnections together.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use magnifico::prelude::*;
//!
//! # async fn demo(catalog: Catalog) -> Result<(), MagnificoError> {
//! let server = GameServerBuilder::new()
//!     .config(ServerConfig::default())
//!     .catalog(catalog)
//!     .build::<BasicRules, _>(UsernameAuthenticator::default());
//!
//! let (link, mut events) = tokio::sync::mpsc::unbounded_channel();
//! let login = server.login("lorenzo").await?;
//! server.join(&login.player_id, Some(2), link).await?;
//! while let Some(event) = events.recv().await {
//!     println!("{event:?}");
//! }
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod server;

pub use config::{ConfigError, ServerConfig};
pub use error::MagnificoError;
pub use server::{GameServer, GameServerBuilder, Login};

/// Everything needed to run a server and talk to it.
pub mod prelude {
    pub use crate::{ConfigError, GameServer, GameServerBuilder, Login, MagnificoError, ServerConfig};
    pub use magnifico_model::{Catalog, Game, ResourceKind, Resources};
    pub use magnifico_protocol::{ActionArea, FamilyMemberColor, Move, PlayerId, RoomId};
    pub use magnifico_room::{
        BasicRules, GameSettings, PlayerSender, RoomEvent, RoomInfo, RoomState, RuleEngine,
    };
    pub use magnifico_session::{Authenticator, SessionConfig, UsernameAuthenticator};
}
