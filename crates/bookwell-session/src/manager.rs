//! The session manager: the single writer of session state.
//!
//! It's responsible for:
//! - Restoring a session from the persisted token at startup
//! - Recording successful and failed logins
//! - Logging out while keeping the preserved business identifier
//! - Keeping the outbound credential slot in sync with the session
//! - Caching the subscription snapshot
//!
//! # Readers and writers
//!
//! State lives in a `tokio::sync::watch` channel. The manager holds the
//! only sender and every mutating method takes `&mut self`, so there is
//! exactly one writer. Any number of readers call
//! [`SessionManager::subscribe`] and see each published [`Session`].

use bookwell_store::{KeyValueStore, StoreError};
use serde_json::Value;
use tokio::sync::watch;

use crate::{
    ApiError, AuthStatus, CredentialSlot, ProfileSource, Session, SessionConfig, SessionError,
    SubscriptionSnapshot, UserProfile, token,
};

/// Owns the authentication session for one app process.
///
/// ## Lifecycle
///
/// ```text
/// initialize() ──→ [Authenticated] ──logout() / handle_auth_fail()──→ [Unauthenticated]
///      │                 ↑                                                  │
///      │                 └──────────────handle_auth_success()───────────────┘
///      └──→ [Unauthenticated]
/// ```
pub struct SessionManager<S, C> {
    /// Persisted key-value store (token, preserved key, subscription cache).
    store: S,

    /// Outbound authorization header.
    credentials: C,

    /// Which keys this manager owns.
    config: SessionConfig,

    /// Published session state. Starts `Unknown` (loading).
    state: watch::Sender<Session>,

    /// Preserved value a logout couldn't write back after clearing the
    /// store. Flushed on the next login, failed login, or logout.
    unrestored: Option<String>,
}

impl<S: KeyValueStore, C: CredentialSlot> SessionManager<S, C> {
    /// Creates a manager in the `Unknown` state. Call
    /// [`initialize`](Self::initialize) before making any routing decision.
    pub fn new(store: S, credentials: C, config: SessionConfig) -> Self {
        let (state, _) = watch::channel(Session::default());
        Self {
            store,
            credentials,
            config,
            state,
            unrestored: None,
        }
    }

    /// Returns a receiver that observes every published session.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    /// Returns a copy of the current session.
    pub fn session(&self) -> Session {
        self.state.borrow().clone()
    }

    /// Returns the current lifecycle state.
    pub fn status(&self) -> AuthStatus {
        self.state.borrow().status
    }

    /// Returns the key configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the credential slot.
    pub fn credentials(&self) -> &C {
        &self.credentials
    }

    // =====================================================================
    // Lifecycle
    // =====================================================================

    /// Restores the session from the persisted token.
    ///
    /// A present, unexpired token is attached to the transport and the
    /// session becomes `Authenticated` with an empty profile; fetching the
    /// profile is the caller's next step. Anything else (no token, expired
    /// or malformed token, store failure) clears the persisted token and
    /// settles `Unauthenticated`.
    ///
    /// Never fails. Store errors are logged and treated as "no session".
    /// Calling it again after the session settled does nothing.
    pub async fn initialize(&mut self) -> Session {
        let from = self.status();
        if from.is_settled() {
            tracing::warn!(status = %from, "session already initialized, ignoring");
            return self.session();
        }

        let persisted = match self.store.get(&self.config.token_key).await {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(error = %e, "could not read persisted token, starting signed out");
                None
            }
        };

        match persisted {
            Some(token) if token::is_valid(&token) => {
                self.credentials.attach(&token);
                self.publish(Session {
                    status: AuthStatus::Authenticated,
                    token: Some(token),
                    user: UserProfile::default(),
                });
                tracing::info!("session restored from persisted token");
            }
            Some(_) => {
                tracing::info!("persisted token expired or malformed, discarding");
                self.settle_signed_out_quietly().await;
            }
            None => {
                tracing::info!("no persisted session");
                self.settle_signed_out_quietly().await;
            }
        }

        self.session()
    }

    /// Records a successful login.
    ///
    /// Attaches `token`, publishes an `Authenticated` session holding
    /// `user`, and persists the token. If persisting fails the session
    /// stays signed in for this launch and the error is returned so the
    /// UI can warn that the login won't be remembered.
    ///
    /// # Errors
    /// - [`SessionError::InvalidTransition`]: called before `initialize()`
    /// - [`SessionError::InvalidCredential`]: the token is already
    ///   expired or malformed; the session is signed out instead
    /// - [`SessionError::Persistence`]: the token couldn't be stored
    pub async fn handle_auth_success(
        &mut self,
        user: UserProfile,
        token: impl Into<String>,
    ) -> Result<(), SessionError> {
        let token = token.into();
        self.require_settled(AuthStatus::Authenticated)?;

        if !token::is_valid(&token) {
            tracing::warn!("login returned an expired or malformed token");
            self.settle_signed_out_quietly().await;
            return Err(SessionError::InvalidCredential(
                "login returned an expired or malformed token".into(),
            ));
        }

        self.credentials.attach(&token);
        tracing::info!(user_id = user.id.as_deref().unwrap_or("-"), "signed in");
        self.publish(Session {
            status: AuthStatus::Authenticated,
            token: Some(token.clone()),
            user,
        });

        self.store
            .set(&self.config.token_key, &token)
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "signed in but token was not persisted"))?;
        self.flush_unrestored().await;
        Ok(())
    }

    /// Records a failed or abandoned login: clears the persisted token,
    /// empties the profile, and detaches the credential.
    ///
    /// # Errors
    /// - [`SessionError::InvalidTransition`]: called before `initialize()`
    /// - [`SessionError::Persistence`]: the token couldn't be removed
    pub async fn handle_auth_fail(&mut self) -> Result<(), SessionError> {
        self.require_settled(AuthStatus::Unauthenticated)?;
        self.settle_signed_out().await?;
        self.flush_unrestored().await;
        tracing::info!("authentication failed, session cleared");
        Ok(())
    }

    /// Signs out.
    ///
    /// Detaches the credential, resets the session, and wipes the store
    /// except for the preserved key, which keeps its value. The in-memory
    /// session is signed out even if the wipe fails. If the preserved value
    /// can't be written back after the clear, the manager holds on to it:
    /// [`last_business_id`](Self::last_business_id) still returns it and the
    /// next login or logout writes it again.
    ///
    /// # Errors
    /// - [`SessionError::InvalidTransition`]: called before `initialize()`
    /// - [`SessionError::Persistence`]: the wipe didn't complete
    pub async fn logout(&mut self) -> Result<(), SessionError> {
        self.require_settled(AuthStatus::Unauthenticated)?;

        self.credentials.detach();
        self.publish(Session::signed_out());
        self.wipe_preserving().await?;

        tracing::info!("signed out");
        Ok(())
    }

    /// Handles a live credential rejection (HTTP 401 mid-session).
    ///
    /// Clears the stored token, signs out, and returns the
    /// [`SessionError::InvalidCredential`] to show the user. Before
    /// `initialize()` nothing changes and the transition error is returned.
    pub async fn handle_rejection(&mut self, reason: impl Into<String>) -> SessionError {
        let reason = reason.into();
        if let Err(e) = self.require_settled(AuthStatus::Unauthenticated) {
            return e;
        }

        tracing::warn!(%reason, "server rejected credential, signing out");
        self.settle_signed_out_quietly().await;
        SessionError::InvalidCredential(reason)
    }

    // =====================================================================
    // Profile
    // =====================================================================

    /// Installs a freshly fetched profile.
    ///
    /// # Errors
    /// Returns [`SessionError::NotAuthenticated`] unless signed in.
    pub fn set_user(&mut self, user: UserProfile) -> Result<(), SessionError> {
        if !self.state.borrow().is_authenticated() {
            return Err(SessionError::NotAuthenticated);
        }
        self.state.send_modify(|session| session.user = user);
        tracing::debug!("profile updated");
        Ok(())
    }

    /// Fetches the profile from `source` and installs it.
    ///
    /// A credential rejection signs the session out (see
    /// [`handle_rejection`](Self::handle_rejection)). Other failures leave
    /// the session as it was and are not retried.
    ///
    /// # Errors
    /// - [`SessionError::NotAuthenticated`]: not signed in
    /// - [`SessionError::InvalidCredential`]: the server returned 401
    /// - [`SessionError::ProfileFetch`]: any other remote failure
    pub async fn refresh_profile<P: ProfileSource>(
        &mut self,
        source: &P,
    ) -> Result<UserProfile, SessionError> {
        if !self.state.borrow().is_authenticated() {
            return Err(SessionError::NotAuthenticated);
        }

        match source.fetch_profile().await {
            Ok(user) => {
                self.set_user(user.clone())?;
                Ok(user)
            }
            Err(ApiError::Unauthorized) => {
                Err(self.handle_rejection("profile request unauthorized").await)
            }
            Err(ApiError::Failed(message)) => {
                tracing::warn!(%message, "profile fetch failed");
                Err(SessionError::ProfileFetch(message))
            }
        }
    }

    // =====================================================================
    // Persisted extras
    // =====================================================================

    /// Projects `payload` into a snapshot and caches it, replacing any
    /// previous snapshot.
    ///
    /// # Errors
    /// - [`SessionError::Subscription`]: the payload has no usable shape
    /// - [`SessionError::Persistence`]: the cache write failed
    pub async fn store_subscription(
        &self,
        payload: &Value,
    ) -> Result<SubscriptionSnapshot, SessionError> {
        let snapshot = SubscriptionSnapshot::from_billing(payload)?;
        let json = serde_json::to_string(&snapshot)
            .map_err(|e| SessionError::Subscription(e.to_string()))?;
        self.store
            .set(&self.config.subscription_key, &json)
            .await?;
        tracing::debug!(subscription_id = %snapshot.id, "subscription snapshot cached");
        Ok(snapshot)
    }

    /// Returns the cached subscription snapshot, if one is stored and
    /// readable. Unreadable caches are logged and ignored.
    pub async fn cached_subscription(&self) -> Option<SubscriptionSnapshot> {
        let raw = match self.store.get(&self.config.subscription_key).await {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!(error = %e, "could not read subscription snapshot");
                return None;
            }
        };
        serde_json::from_str(&raw)
            .inspect_err(|e| tracing::warn!(error = %e, "discarding unreadable subscription snapshot"))
            .ok()
    }

    /// Stores the business identifier that survives logout.
    ///
    /// # Errors
    /// Returns [`SessionError::Persistence`] if the write fails.
    pub async fn remember_business_id(&mut self, business_id: &str) -> Result<(), SessionError> {
        self.store
            .set(&self.config.preserved_key, business_id)
            .await?;
        self.unrestored = None;
        Ok(())
    }

    /// Returns the business identifier preserved across logouts.
    pub async fn last_business_id(&self) -> Option<String> {
        if let Some(value) = &self.unrestored {
            return Some(value.clone());
        }
        self.store
            .get(&self.config.preserved_key)
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "could not read last business id"))
            .ok()
            .flatten()
    }

    // =====================================================================
    // Internals
    // =====================================================================

    fn publish(&self, next: Session) {
        debug_assert!(
            self.status().can_transition_to(next.status),
            "illegal session transition {} -> {}",
            self.status(),
            next.status
        );
        self.state.send_replace(next);
    }

    fn require_settled(&self, to: AuthStatus) -> Result<(), SessionError> {
        let from = self.status();
        if !from.is_settled() {
            tracing::warn!(%from, %to, "session operation before initialize");
            return Err(SessionError::InvalidTransition { from, to });
        }
        Ok(())
    }

    /// Detaches, publishes a signed-out session, and removes the token.
    async fn settle_signed_out(&self) -> Result<(), StoreError> {
        self.credentials.detach();
        self.publish(Session::signed_out());
        self.store.remove(&self.config.token_key).await
    }

    async fn settle_signed_out_quietly(&self) {
        if let Err(e) = self.settle_signed_out().await {
            tracing::warn!(error = %e, "could not remove persisted token");
        }
    }

    /// Writes back a preserved value a previous logout couldn't restore.
    async fn flush_unrestored(&mut self) {
        let Some(value) = self.unrestored.take() else {
            return;
        };
        match self.store.set(&self.config.preserved_key, &value).await {
            Ok(()) => tracing::info!("restored preserved key left over from logout"),
            Err(e) => {
                tracing::warn!(error = %e, "preserved key still not restored");
                self.unrestored = Some(value);
            }
        }
    }

    /// Clears the store, then restores the preserved key.
    async fn wipe_preserving(&mut self) -> Result<(), StoreError> {
        let key = self.config.preserved_key.clone();
        let preserved = match self.unrestored.take() {
            Some(value) => Some(value),
            None => match self.store.get(&key).await {
                Ok(value) => value,
                Err(e) => {
                // Can't tell what to keep, so only drop the keys this
                // manager owns and leave the rest for the next logout.
                    tracing::warn!(error = %e, "could not read preserved key, removing session keys only");
                    self.store.remove(&self.config.token_key).await?;
                    self.store.remove(&self.config.subscription_key).await?;
                    return Err(e);
                }
            },
        };

        if let Err(e) = self.store.clear().await {
            self.unrestored = preserved;
            return Err(e);
        }
        if let Some(value) = preserved {
            if let Err(e) = self.store.set(&key, &value).await {
                tracing::warn!(error = %e, "could not restore preserved key, holding it until the next write");
                self.unrestored = Some(value);
                return Err(e);
            }
        }
        Ok(())
    }
}

// =========================================================================
// Tests
// =========================================================================
