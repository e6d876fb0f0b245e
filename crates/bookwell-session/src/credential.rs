//! The outbound authorization header slot.
//!
//! Every outgoing API request reads one shared "default authorization
//! header". The session manager is the only writer: it attaches the
//! bearer token when a session becomes valid and detaches it when the
//! session ends. Attaching and detaching are plain header mutations and
//! can't fail.

use std::sync::{Arc, PoisonError, RwLock};

/// Where the session manager writes the current bearer credential.
///
/// Implement this for your HTTP client's default-header mechanism, or use
/// [`AuthHeader`] and have your client read from it.
pub trait CredentialSlot: Send + Sync + 'static {
    /// Makes every subsequent request carry `token`.
    fn attach(&self, token: &str);

    /// Stops sending any credential.
    fn detach(&self);
}

/// A shareable `Authorization` header value.
///
/// Clones share the same slot, so hand one clone to the session manager
/// and keep others in your request builders.
#[derive(Debug, Clone, Default)]
pub struct AuthHeader {
    value: Arc<RwLock<Option<String>>>,
}

impl AuthHeader {
    /// Creates an empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// The full header value (`"Bearer <token>"`), if a credential is attached.
    pub fn value(&self) -> Option<String> {
        self.value
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns `true` if a credential is attached.
    pub fn is_attached(&self) -> bool {
        self.value
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

impl CredentialSlot for AuthHeader {
    fn attach(&self, token: &str) {
        *self.value.write().unwrap_or_else(PoisonError::into_inner) =
            Some(format!("Bearer {token}"));
    }

    fn detach(&self) {
        *self.value.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}
