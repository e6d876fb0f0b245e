//! Session types: the state every screen reads to decide what to show.
//!
//! A "session" is the client's record of who is signed in. It tracks:
//! - WHETHER startup restore has finished (`status`)
//! - WHICH credential is attached to outbound requests (`token`)
//! - WHO the user is (`user`), once the profile has been fetched

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::UserProfile;

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Which persisted keys the session manager owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionConfig {
    /// Key holding the bearer token.
    pub token_key: String,

    /// Key that survives logout: the last business the user worked in,
    /// so the next login lands in the same place.
    pub preserved_key: String,

    /// Key holding the cached subscription snapshot (JSON).
    pub subscription_key: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            token_key: "token".into(),
            preserved_key: "lastBusinessId".into(),
            subscription_key: "subscription".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// AuthStatus
// ---------------------------------------------------------------------------

/// Where the session is in its lifecycle.
///
/// ```text
///                 initialize()
///   Unknown ──────────┬──────────→ Authenticated
///                     │               │      ↑
///                     │  logout() /   │      │ handle_auth_success()
///                     │  auth fail    ▼      │
///                     └──────────→ Unauthenticated
/// ```
///
/// `Unknown` is left exactly once per launch and never re-entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AuthStatus {
    /// Startup restore hasn't finished. Screens show a spinner.
    #[default]
    Unknown,
    /// A non-expired token is held and attached to the transport.
    Authenticated,
    /// No usable token.
    Unauthenticated,
}

impl AuthStatus {
    /// Returns `true` once startup restore has finished.
    pub fn is_settled(self) -> bool {
        !matches!(self, Self::Unknown)
    }

    /// Returns `true` if the state machine allows moving to `target`.
    ///
    /// Staying in a settled state is allowed (re-login refreshes the token,
    /// a second logout re-runs cleanup). Nothing moves back to `Unknown`.
    pub fn can_transition_to(self, target: Self) -> bool {
        target.is_settled()
    }
}

impl fmt::Display for AuthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => write!(f, "Unknown"),
            Self::Authenticated => write!(f, "Authenticated"),
            Self::Unauthenticated => write!(f, "Unauthenticated"),
        }
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// A snapshot of the session as published to readers.
///
/// `is_authenticated()` and `is_loading()` are derived from `status`, so
/// they can't disagree with it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    /// Lifecycle state.
    pub status: AuthStatus,

    /// The bearer credential, present only while authenticated.
    pub token: Option<String>,

    /// The user's profile. Empty until a profile fetch fills it in.
    pub user: UserProfile,
}

impl Session {
    /// A settled, signed-out session.
    pub fn signed_out() -> Self {
        Self {
            status: AuthStatus::Unauthenticated,
            token: None,
            user: UserProfile::default(),
        }
    }

    /// `true` only while a non-expired token is held.
    pub fn is_authenticated(&self) -> bool {
        self.status == AuthStatus::Authenticated
    }

    /// `true` only before startup restore finishes.
    pub fn is_loading(&self) -> bool {
        self.status == AuthStatus::Unknown
    }
}
