//! Authentication session lifecycle for the Bookwell client.
//!
//! This crate owns "is someone signed in, and with which credential":
//!
//! 1. **Token inspection**: reading the expiry claim of a bearer token
//!    ([`token::is_valid`])
//! 2. **Session tracking**: restoring, recording, and clearing the
//!    session ([`SessionManager`])
//! 3. **Transport sync**: keeping the outbound authorization header in
//!    step with the session ([`CredentialSlot`], [`AuthHeader`])
//! 4. **Local caches**: the subscription snapshot and the business
//!    identifier that survives logout
//!
//! # How it fits in the stack
//!
//! ```text
//! Route Layer (above)  ← reads Session to pick a navigation stack
//!     ↕
//! Session Layer (this crate)  ← single writer of Session
//!     ↕
//! Store Layer (below)  ← persists token and caches
//! ```

#![allow(async_fn_in_trait)]

mod credential;
mod error;
mod manager;
mod profile;
mod session;
mod subscription;
pub mod token;

pub use credential::{AuthHeader, CredentialSlot};
pub use error::{ApiError, SessionError};
pub use manager::SessionManager;
pub use profile::{BusinessInfo, ProfileSource, Service, UserProfile};
pub use session::{AuthStatus, Session, SessionConfig};
pub use subscription::SubscriptionSnapshot;
pub use token::TokenClaims;
