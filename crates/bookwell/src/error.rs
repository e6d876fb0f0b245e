//! Unified error type for the Bookwell client core.

use bookwell_session::SessionError;
use bookwell_store::StoreError;

/// Top-level error that wraps all crate-specific errors.
///
/// App shells deal with this single type; `#[from]` on each variant lets
/// `?` convert the sub-crate errors.
#[derive(Debug, thiserror::Error)]
pub enum BookwellError {
    /// A storage error surfaced outside the session manager.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A session-level error (transition, credential, profile, persistence).
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The configuration document couldn't be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl BookwellError {
    /// Returns `true` if the user must sign in again.
    pub fn requires_sign_in(&self) -> bool {
        matches!(
            self,
            Self::Session(SessionError::InvalidCredential(_) | SessionError::NotAuthenticated)
        )
    }
}
