//! Error types for the session layer.

use magnifico_protocol::PlayerId;

/// Errors raised while logging in, disconnecting or reconnecting.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The [`Authenticator`](crate::Authenticator) rejected the credentials.
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// No session exists for the player.
    #[error("session not found for player {0}")]
    NotFound(PlayerId),

    /// The reconnection token was never issued or was already cleaned up.
    #[error("invalid reconnection token")]
    InvalidToken,

    /// The reconnection grace period elapsed.
    #[error("session expired for player {0}")]
    SessionExpired(PlayerId),

    /// The username is already logged in.
    #[error("player {0} is already logged in")]
    AlreadyConnected(PlayerId),
}
