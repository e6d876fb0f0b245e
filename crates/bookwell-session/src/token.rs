//! Bearer token inspection.
//!
//! The client never verifies signatures; that's the server's job. All it
//! needs is the `exp` claim, so it can skip restoring a session the server
//! would reject anyway.
//!
//! Tokens are JWT-shaped: `header.payload.signature`, each segment
//! base64url-encoded, the payload a JSON object.

use std::time::{SystemTime, UNIX_EPOCH};

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Deserialize;

use crate::SessionError;

/// The claims the client reads from a token payload.
///
/// Times are JSON numbers and may carry a fractional part.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TokenClaims {
    /// Expiry, in seconds since the Unix epoch.
    pub exp: f64,

    /// Subject (usually the user ID), if present.
    #[serde(default)]
    pub sub: Option<String>,

    /// Issued-at, in seconds since the Unix epoch, if present.
    #[serde(default)]
    pub iat: Option<f64>,
}

/// Decodes the payload segment of `token`.
///
/// # Errors
/// Returns [`SessionError::InvalidCredential`] if the token doesn't have
/// three segments, the payload isn't base64url, or the JSON lacks a
/// numeric `exp`.
pub fn decode_claims(token: &str) -> Result<TokenClaims, SessionError> {
    let mut segments = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(SessionError::InvalidCredential(
            "expected three dot-separated segments".into(),
        ));
    };

    // Some issuers keep the padding; the no-pad engine rejects it.
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| SessionError::InvalidCredential(format!("payload is not base64url: {e}")))?;

    serde_json::from_slice(&bytes)
        .map_err(|e| SessionError::InvalidCredential(format!("payload has no usable claims: {e}")))
}

/// Returns `true` if `token` decodes and expires strictly after `now`.
pub fn is_valid_at(token: &str, now: SystemTime) -> bool {
    let now_secs = now
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0);

    match decode_claims(token) {
        Ok(claims) => claims.exp > now_secs,
        Err(_) => false,
    }
}

/// Returns `true` if `token` decodes and hasn't expired yet.
pub fn is_valid(token: &str) -> bool {
    is_valid_at(token, SystemTime::now())
}
