//! # Bookwell
//!
//! Session and routing core for the Bookwell business-management client.
//!
//! The app shell owns one [`App`], awaits [`App::start`] before drawing
//! any navigation stack, and hands [`RouteGate`](bookwell_route::RouteGate)s
//! to whatever renders screens.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bookwell::prelude::*;
//!
//! # async fn run() -> Result<(), BookwellError> {
//! bookwell::logging::init("info");
//!
//! let header = AuthHeader::new();
//! let mut app = App::builder()
//!     .config(AppConfig::from_json(r#"{ "session": { "tokenKey": "token" } }"#)?)
//!     .build(MemoryStore::new(), header.clone());
//!
//! match app.start().await {
//!     Route::ShowSpinner => unreachable!("start() always settles"),
//!     Route::Unauthenticated => { /* show sign-in */ }
//!     Route::Onboarding(step) => { /* open onboarding at `step` */ let _ = step; }
//!     Route::Authenticated => { /* show the main app */ }
//! }
//! # Ok(())
//! # }
//! ```

mod app;
mod config;
mod error;
pub mod logging;

pub use app::{App, AppBuilder};
pub use config::AppConfig;
pub use error::BookwellError;

/// Everything an app shell usually needs, in one import.
pub mod prelude {
    pub use crate::{App, AppBuilder, AppConfig, BookwellError};
    pub use bookwell_route::{OnboardingStep, Route, RouteGate, onboarding_step, select_route};
    pub use bookwell_session::{
        ApiError, AuthHeader, AuthStatus, BusinessInfo, CredentialSlot, ProfileSource, Service,
        Session, SessionConfig, SessionError, SessionManager, SubscriptionSnapshot, UserProfile,
    };
    pub use bookwell_store::{JsonFileStore, KeyValueStore, MemoryStore, StoreError};
}
