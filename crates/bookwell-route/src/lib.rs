//! Navigation-stack selection for the Bookwell client.
//!
//! Given the current [`Session`](bookwell_session::Session), decide which
//! top-level stack the app shows:
//!
//! - a spinner while the session is still being restored,
//! - the sign-in stack when nobody is signed in,
//! - the onboarding stack (at the right step) while the profile is
//!   incomplete,
//! - the main app otherwise.
//!
//! Everything here is a pure function of the session except
//! [`RouteGate`], which follows the session manager's published state and
//! recomputes on every change.

mod gate;
mod onboarding;
mod route;

pub use gate::RouteGate;
pub use onboarding::{OnboardingStep, onboarding_step};
pub use route::{Route, select_route};
