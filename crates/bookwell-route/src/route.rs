//! The route decision.

use std::fmt;

use bookwell_session::Session;
use serde::{Deserialize, Serialize};

use crate::{OnboardingStep, onboarding_step};

/// Which top-level navigation stack to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Route {
    /// Session restore is still running; no stack decision yet.
    ShowSpinner,
    /// Sign-in / sign-up screens.
    Unauthenticated,
    /// Onboarding screens, opened at the given step.
    Onboarding(OnboardingStep),
    /// The main app.
    Authenticated,
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShowSpinner => write!(f, "ShowSpinner"),
            Self::Unauthenticated => write!(f, "Unauthenticated"),
            Self::Onboarding(step) => write!(f, "Onboarding({step})"),
            Self::Authenticated => write!(f, "Authenticated"),
        }
    }
}

/// Maps a session to a stack. Pure; never panics.
pub fn select_route(session: &Session) -> Route {
    if session.is_loading() {
        return Route::ShowSpinner;
    }
    if !session.is_authenticated() {
        return Route::Unauthenticated;
    }
    match onboarding_step(&session.user) {
        OnboardingStep::Completed => Route::Authenticated,
        step => Route::Onboarding(step),
    }
}
