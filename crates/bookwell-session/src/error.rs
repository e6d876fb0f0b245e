//! Error types for the session layer.

use bookwell_store::StoreError;

use crate::AuthStatus;

/// Errors that can occur during session management.
///
/// Silent startup ([`SessionManager::initialize`](crate::SessionManager::initialize))
/// never returns any of these; it resolves every failure to "logged out".
/// Explicit operations return them so the UI can show a failure notice.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Reading or writing the persisted store failed.
    #[error("persistence failed: {0}")]
    Persistence(#[from] StoreError),

    /// The credential is malformed, expired, or was rejected by the server.
    #[error("invalid credential: {0}")]
    InvalidCredential(String),

    /// The remote profile request failed for a reason other than a
    /// credential rejection. Not retried automatically.
    #[error("profile fetch failed: {0}")]
    ProfileFetch(String),

    /// The operation isn't allowed from the current session state.
    /// For example, logging out before the session was restored.
    #[error("cannot move session from {from} to {to}")]
    InvalidTransition { from: AuthStatus, to: AuthStatus },

    /// The operation needs an authenticated session and there isn't one.
    #[error("no authenticated session")]
    NotAuthenticated,

    /// A subscription payload couldn't be projected into a snapshot.
    #[error("subscription payload rejected: {0}")]
    Subscription(String),
}

/// Failure returned by a remote collaborator (profile or auth API).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The server rejected the credential (HTTP 401).
    #[error("request unauthorized")]
    Unauthorized,

    /// Any other failure, mapped to a generic message.
    #[error("request failed: {0}")]
    Failed(String),
}
