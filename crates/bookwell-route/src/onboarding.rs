//! Onboarding progress, derived from the profile every time it's needed.

use std::fmt;

use bookwell_session::UserProfile;
use serde::{Deserialize, Serialize};

/// How far a newly signed-in user is through mandatory setup.
///
/// Steps are ordered: a user who hasn't entered business details is on
/// `NeedsBusinessInfo` even if they somehow already have services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OnboardingStep {
    /// Business name and phone are missing.
    NeedsBusinessInfo,
    /// No bookable services yet.
    NeedsServices,
    /// No active subscription.
    NeedsPayment,
    /// Setup done.
    Completed,
}

impl OnboardingStep {
    /// Returns `true` once setup is done.
    pub fn is_completed(self) -> bool {
        matches!(self, Self::Completed)
    }

    /// The step after this one, or `None` from `Completed`.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::NeedsBusinessInfo => Some(Self::NeedsServices),
            Self::NeedsServices => Some(Self::NeedsPayment),
            Self::NeedsPayment => Some(Self::Completed),
            Self::Completed => None,
        }
    }
}

impl fmt::Display for OnboardingStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NeedsBusinessInfo => write!(f, "NeedsBusinessInfo"),
            Self::NeedsServices => write!(f, "NeedsServices"),
            Self::NeedsPayment => write!(f, "NeedsPayment"),
            Self::Completed => write!(f, "Completed"),
        }
    }
}

/// Computes the onboarding step for `user`.
///
/// An empty profile (signed in, not fetched yet) is on the first step.
pub fn onboarding_step(user: &UserProfile) -> OnboardingStep {
    if !user.business.is_complete() {
        OnboardingStep::NeedsBusinessInfo
    } else if user.services.is_empty() {
        OnboardingStep::NeedsServices
    } else if !user.subscription_active {
        OnboardingStep::NeedsPayment
    } else {
        OnboardingStep::Completed
    }
}
