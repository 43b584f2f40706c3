//! Authentication hook for validating player identity.
//!
//! Account storage lives outside this workspace. The server only needs an
//! [`Authenticator`] that turns login credentials into a stable
//! [`PlayerId`]; [`UsernameAuthenticator`] is the trivial one used by the
//! demo and the tests.

use magnifico_protocol::PlayerId;

use crate::SessionError;

/// Validates login credentials and returns the player's identity.
///
/// The returned `PlayerId` is the key used for admission and
/// reconnection, so it must be stable across logins of the same account.
pub trait Authenticator: Send + Sync + 'static {
    /// Validates `credentials` and returns the player's identity.
    fn authenticate(
        &self,
        credentials: &str,
    ) -> impl std::future::Future<Output = Result<PlayerId, SessionError>> + Send;
}

/// Accepts any well-formed username as the identity.
///
/// Surrounding whitespace is trimmed. Empty names, names longer than
/// `max_len` and names with control characters are rejected.
#[derive(Debug, Clone)]
pub struct UsernameAuthenticator {
    pub max_len: usize,
}

impl Default for UsernameAuthenticator {
    fn default() -> Self {
        Self { max_len: 32 }
    }
}

impl Authenticator for UsernameAuthenticator {
    async fn authenticate(&self, credentials: &str) -> Result<PlayerId, SessionError> {
        let name = credentials.trim();
        if name.is_empty() {
            return Err(SessionError::AuthFailed("username is empty".into()));
        }
        if name.chars().count() > self.max_len {
            return Err(SessionError::AuthFailed(format!(
                "username longer than {} characters",
                self.max_len
            )));
        }
        if name.chars().any(char::is_control) {
            return Err(SessionError::AuthFailed(
                "username contains control characters".into(),
            ));
        }
        Ok(PlayerId::new(name))
    }
}
