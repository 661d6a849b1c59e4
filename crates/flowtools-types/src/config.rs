//! Configuration types for flowtools.
//!
//! `FlowtoolsConfig` represents the `config.toml` that names the workflow
//! event types and tunes the relay HTTP client. Event names have no default:
//! they must be resolved into [`EventNames`] before anything can be built.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Key of the error event name, as reported in configuration errors.
pub const ERROR_EVENT_NAME_KEY: &str = "events.error_event_name";

/// Key of the deploy event name, as reported in configuration errors.
pub const DEPLOY_EVENT_NAME_KEY: &str = "events.deploy_event_name";

/// Top-level configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlowtoolsConfig {
    #[serde(default)]
    pub events: EventsConfig,

    #[serde(default)]
    pub relay: RelayConfig,
}

/// Raw `[events]` table. Both required names may be missing here; use
/// [`EventsConfig::resolve`] to get validated [`EventNames`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventsConfig {
    /// Event type used for workflow error notifications.
    pub error_event_name: Option<String>,

    /// Event type used when a deployment (transformation) was saved.
    pub deploy_event_name: Option<String>,

    /// Optional event type for workflow start notifications.
    #[serde(default)]
    pub started_event_name: Option<String>,
}

impl EventsConfig {
    /// Validate the raw table into the immutable names used by the builder.
    ///
    /// Blank values count as missing.
    pub fn resolve(&self) -> Result<EventNames, ConfigError> {
        let error = non_blank(&self.error_event_name)
            .ok_or(ConfigError::MissingEventName(ERROR_EVENT_NAME_KEY))?;
        let deploy = non_blank(&self.deploy_event_name)
            .ok_or(ConfigError::MissingEventName(DEPLOY_EVENT_NAME_KEY))?;

        Ok(EventNames {
            error,
            deploy,
            started: non_blank(&self.started_event_name),
        })
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Event type names resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventNames {
    pub error: String,
    pub deploy: String,
    pub started: Option<String>,
}

impl EventNames {
    pub fn new(error: impl Into<String>, deploy: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            deploy: deploy.into(),
            started: None,
        }
    }

    pub fn with_started(mut self, started: impl Into<String>) -> Self {
        self.started = Some(started.into());
        self
    }
}

/// HTTP client settings for the file relay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// TCP/TLS connect timeout in seconds.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Overall per-request deadline in seconds (covers the whole upload).
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_connect_timeout_secs() -> u64 {
    30
}

fn default_request_timeout_secs() -> u64 {
    600
}

fn default_user_agent() -> String {
    "flowtools-relay/0.1".to_string()
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: default_connect_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_has_no_event_names() {
        let config = FlowtoolsConfig::default();
        assert!(config.events.error_event_name.is_none());
        assert!(config.events.deploy_event_name.is_none());
        assert_eq!(config.relay.connect_timeout_secs, 30);
        assert_eq!(config.relay.request_timeout_secs, 600);
    }

    #[test]
    fn test_deserialize_empty_toml() {
        let config: FlowtoolsConfig = toml::from_str("").unwrap();
        assert!(config.events.resolve().is_err());
        assert_eq!(config.relay.user_agent, "flowtools-relay/0.1");
    }

    #[test]
    fn test_deserialize_with_values() {
        let toml_str = r#"
[events]
error_event_name = "error"
deploy_event_name = "transformation-saved"

[relay]
connect_timeout_secs = 5
"#;
        let config: FlowtoolsConfig = toml::from_str(toml_str).unwrap();
        let names = config.events.resolve().unwrap();
        assert_eq!(names, EventNames::new("error", "transformation-saved"));
        assert_eq!(config.relay.connect_timeout_secs, 5);
        assert_eq!(config.relay.request_timeout_secs, 600);
    }

    #[test]
    fn test_resolve_reports_missing_error_name_first() {
        let events = EventsConfig::default();
        let err = events.resolve().unwrap_err();
        assert!(matches!(err, ConfigError::MissingEventName(ERROR_EVENT_NAME_KEY)));
    }

    #[test]
    fn test_resolve_treats_blank_as_missing() {
        let events = EventsConfig {
            error_event_name: Some("error".to_string()),
            deploy_event_name: Some("   ".to_string()),
            started_event_name: Some(String::new()),
        };
        let err = events.resolve().unwrap_err();
        assert!(matches!(err, ConfigError::MissingEventName(DEPLOY_EVENT_NAME_KEY)));
    }

    #[test]
    fn test_resolve_keeps_started_name() {
        let events = EventsConfig {
            error_event_name: Some("error".to_string()),
            deploy_event_name: Some("deploy".to_string()),
            started_event_name: Some("started".to_string()),
        };
        let names = events.resolve().unwrap();
        assert_eq!(names.started.as_deref(), Some("started"));
    }
}
