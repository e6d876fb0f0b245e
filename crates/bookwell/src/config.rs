//! Application configuration.

use bookwell_session::SessionConfig;
use serde::{Deserialize, Serialize};

use crate::BookwellError;

/// Settings the app shell passes to [`App::builder`](crate::App::builder).
///
/// Every field has a default, so `{}` is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    /// Persisted key names owned by the session manager.
    pub session: SessionConfig,

    /// Default `tracing` filter, used when `RUST_LOG` isn't set.
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            session: SessionConfig::default(),
            log_filter: "info".into(),
        }
    }
}

impl AppConfig {
    /// Parses a JSON configuration document.
    ///
    /// # Errors
    /// Returns [`BookwellError::Config`] if the JSON is malformed or a field
    /// has the wrong type.
    pub fn from_json(json: &str) -> Result<Self, BookwellError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_config_default() {
        let config = AppConfig::default();
        assert_eq!(config.log_filter, "info");
        assert_eq!(config.session, SessionConfig::default());
    }

    #[test]
    fn test_from_json_empty_object_is_default() {
        assert_eq!(AppConfig::from_json("{}").unwrap(), AppConfig::default());
    }

    #[test]
    fn test_from_json_overrides_nested_keys() {
        let config = AppConfig::from_json(
            r#"{ "logFilter": "bookwell=debug", "session": { "preservedKey": "biz" } }"#,
        )
        .unwrap();

        assert_eq!(config.log_filter, "bookwell=debug");
        assert_eq!(config.session.preserved_key, "biz");
        assert_eq!(config.session.token_key, "token");
    }

    #[test]
    fn test_from_json_wrong_type_is_config_error() {
        let result = AppConfig::from_json(r#"{ "logFilter": 3 }"#);

        assert!(matches!(result, Err(BookwellError::Config(_))));
    }
}
