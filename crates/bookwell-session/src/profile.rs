//! The user profile record and the remote source it comes from.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::ApiError;

/// Business details collected during the first onboarding step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BusinessInfo {
    pub id: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub timezone: Option<String>,
}

impl BusinessInfo {
    /// A business is set up once it has a name and a phone number.
    pub fn is_complete(&self) -> bool {
        is_filled(self.name.as_deref()) && is_filled(self.phone.as_deref())
    }
}

/// A bookable service the business offers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Service {
    pub id: Option<String>,
    pub name: String,
    pub duration_minutes: u32,
    pub price_cents: u64,
}

/// The signed-in user's profile as returned by the profile API.
///
/// Every field is optional on the wire. Between a successful login and the
/// first profile fetch the session holds `UserProfile::default()`, which
/// [`is_empty`](Self::is_empty) reports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub business: BusinessInfo,
    pub services: Vec<Service>,
    pub subscription_active: bool,
    pub stripe_customer_id: Option<String>,
}

impl UserProfile {
    /// Returns `true` if no profile field has been populated.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// "First Last", falling back to the email, then to an empty string.
    pub fn display_name(&self) -> String {
        let name = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.trim().is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if name.is_empty() {
            self.email.clone().unwrap_or_default()
        } else {
            name
        }
    }
}

fn is_filled(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

/// Fetches the current user's profile from the remote API.
///
/// The request is expected to carry whatever credential the session
/// manager last attached to the transport; this trait doesn't pass one.
///
/// # Example
///
/// ```rust
/// use bookwell_session::{ApiError, ProfileSource, UserProfile};
///
/// /// Always returns the same profile. Handy in previews.
/// struct FixedProfile(UserProfile);
///
/// impl ProfileSource for FixedProfile {
///     async fn fetch_profile(&self) -> Result<UserProfile, ApiError> {
///         Ok(self.0.clone())
///     }
/// }
/// ```
pub trait ProfileSource: Send + Sync {
    /// Returns the profile, [`ApiError::Unauthorized`] if the server
    /// rejected the credential, or [`ApiError::Failed`] otherwise.
    fn fetch_profile(
        &self,
    ) -> impl Future<Output = Result<UserProfile, ApiError>> + Send;
}
