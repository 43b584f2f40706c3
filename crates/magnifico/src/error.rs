//! Unified error type for the Magnifico server.

use magnifico_model::ModelError;
use magnifico_room::{RoomError, SetupError};
use magnifico_session::SessionError;

use crate::ConfigError;

/// Top-level error wrapping every crate-specific error.
///
/// The `#[from]` attributes let `?` convert sub-crate errors directly.
#[derive(Debug, thiserror::Error)]
pub enum MagnificoError {
    /// Login, disconnect or reconnect failed.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Admission or decision routing failed.
    #[error(transparent)]
    Room(#[from] RoomError),

    #[error(transparent)]
    Setup(#[from] SetupError),

    /// The card catalog could not be loaded.
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
