//! Follows published sessions and reports route changes.
//!
//! The route is never cached beyond a single read: onboarding progress
//! can change while the session stays `Authenticated` (a profile edit adds
//! the first service, a payment activates the subscription), so every
//! read recomputes from the latest session.

use bookwell_session::Session;
use tokio::sync::watch;

use crate::{Route, select_route};

/// A read-only view of the session that answers "which stack now?".
///
/// Build one from [`SessionManager::subscribe`](bookwell_session::SessionManager::subscribe).
/// Any number of gates can watch the same manager.
#[derive(Debug, Clone)]
pub struct RouteGate {
    sessions: watch::Receiver<Session>,

    /// The route last returned by [`next_change`](Self::next_change) (or
    /// computed at construction). Only used to suppress repeats.
    last: Route,
}

impl RouteGate {
    /// Creates a gate positioned at the current session.
    pub fn new(sessions: watch::Receiver<Session>) -> Self {
        let last = select_route(&sessions.borrow());
        Self { sessions, last }
    }

    /// Computes the route for the latest published session.
    pub fn current(&self) -> Route {
        select_route(&self.sessions.borrow())
    }

    /// Returns a copy of the latest published session.
    pub fn session(&self) -> Session {
        self.sessions.borrow().clone()
    }

    /// Waits until the route differs from the last one this gate reported.
    ///
    /// Session updates that don't change the route (for example a profile
    /// edit that leaves onboarding where it was) are skipped. Returns
    /// `None` once the session manager has been dropped.
    pub async fn next_change(&mut self) -> Option<Route> {
        loop {
            if self.sessions.changed().await.is_err() {
                tracing::debug!("session manager dropped, route gate closing");
                return None;
            }
            let route = select_route(&self.sessions.borrow_and_update());
            if route != self.last {
                tracing::debug!(from = %self.last, to = %route, "route changed");
                self.last = route;
                return Some(route);
            }
        }
    }
}
