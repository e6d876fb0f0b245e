//! `App` builder and startup.
//!
//! This is the entry point for an app shell. It ties the layers together:
//! store → session → route.

use bookwell_route::{Route, RouteGate, select_route};
use bookwell_session::{CredentialSlot, SessionConfig, SessionManager};
use bookwell_store::KeyValueStore;

use crate::AppConfig;

/// Builder for configuring an [`App`].
///
/// # Example
///
/// ```rust,ignore
/// let app = App::builder()
///     .session_config(SessionConfig::default())
///     .build(store, AuthHeader::new());
/// ```
#[derive(Debug, Clone, Default)]
pub struct AppBuilder {
    config: AppConfig,
}

impl AppBuilder {
    /// Creates a builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets only the session key configuration.
    pub fn session_config(mut self, session: SessionConfig) -> Self {
        self.config.session = session;
        self
    }

    /// Builds the app around a store and a credential slot. Nothing is read
    /// from the store until [`App::start`].
    pub fn build<S, C>(self, store: S, credentials: C) -> App<S, C>
    where
        S: KeyValueStore,
        C: CredentialSlot,
    {
        App {
            session: SessionManager::new(store, credentials, self.config.session.clone()),
            config: self.config,
        }
    }
}

/// The client core for one app process.
///
/// Owns the [`SessionManager`] (the only writer of session state) and
/// hands out [`RouteGate`]s to readers.
pub struct App<S, C> {
    session: SessionManager<S, C>,
    config: AppConfig,
}

impl App<(), ()> {
    /// Creates a new builder.
    ///
    /// The store and credential types are picked by [`AppBuilder::build`],
    /// so `App::builder()` needs no type annotations.
    pub fn builder() -> AppBuilder {
        AppBuilder::new()
    }
}

impl<S: KeyValueStore, C: CredentialSlot> App<S, C> {
    /// Restores the session and returns the first settled route.
    ///
    /// Must be awaited before any navigation decision; until it completes
    /// every gate reports [`Route::ShowSpinner`].
    pub async fn start(&mut self) -> Route {
        let session = self.session.initialize().await;
        let route = select_route(&session);
        tracing::info!(%route, "app started");
        route
    }

    /// The route for the current session.
    pub fn route(&self) -> Route {
        select_route(&self.session.session())
    }

    /// A new gate following this app's session.
    pub fn route_gate(&self) -> RouteGate {
        RouteGate::new(self.session.subscribe())
    }

    /// The session manager, for reads.
    pub fn session(&self) -> &SessionManager<S, C> {
        &self.session
    }

    /// The session manager, for login, logout, and profile updates.
    pub fn session_mut(&mut self) -> &mut SessionManager<S, C> {
        &mut self.session
    }

    /// The configuration this app was built with.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}
