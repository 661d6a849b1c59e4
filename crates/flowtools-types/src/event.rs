//! CloudEvent envelope types for workflow lifecycle notifications.
//!
//! `EventEnvelope` serializes in the CloudEvents 1.0 JSON structured format:
//! context attributes at the top level, extension attributes flattened next
//! to them, and the `EventPayload` under `data`.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// CloudEvents specification version emitted on every envelope.
pub const CLOUD_EVENTS_SPEC_VERSION: &str = "1.0";

/// Content type of the `data` member.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Extension attribute carrying the workflow instance the event belongs to.
pub const WORKFLOW_PROCESS_REF_ID: &str = "workflow-process-ref-id";

/// A CloudEvent published on the workflow engine's notification channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Random v4 identifier, unique per built envelope.
    pub id: Uuid,
    /// Caller-supplied origin of the event.
    pub source: String,
    pub specversion: String,
    /// Event category (e.g. the configured error or deploy event name).
    #[serde(rename = "type")]
    pub event_type: String,
    /// Wall-clock time at which the envelope was built.
    pub time: DateTime<Utc>,
    pub datacontenttype: String,
    /// Extension attributes. Always contains [`WORKFLOW_PROCESS_REF_ID`].
    #[serde(flatten)]
    pub extensions: BTreeMap<String, String>,
    pub data: EventPayload,
}

impl EventEnvelope {
    /// The workflow identifier carried in the extensions, if present.
    pub fn workflow_id(&self) -> Option<&str> {
        self.extensions
            .get(WORKFLOW_PROCESS_REF_ID)
            .map(String::as_str)
    }
}

/// Payload carried in the `data` member of an envelope.
///
/// Error events set `error`, deploy events set `message`. Absent fields are
/// omitted from the serialized JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl EventPayload {
    /// A payload with neither field set.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A payload carrying an informational message.
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            error: None,
            message: Some(message.into()),
        }
    }

    /// A payload carrying an error description.
    pub fn with_error(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            message: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.error.is_none() && self.message.is_none()
    }
}

/// Workflow lifecycle signals that map onto configured event names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "signal", rename_all = "snake_case")]
pub enum LifecycleSignal {
    /// The workflow has started. Carries no payload.
    Started,
    /// The workflow finished; `message` is typically the deployed app host.
    Completed { message: String },
    /// The workflow failed with the given error.
    Failed { error: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_envelope(data: EventPayload) -> EventEnvelope {
        let mut extensions = BTreeMap::new();
        extensions.insert(WORKFLOW_PROCESS_REF_ID.to_string(), "wf-42".to_string());
        EventEnvelope {
            id: Uuid::new_v4(),
            source: "cluster-onboarding".to_string(),
            specversion: CLOUD_EVENTS_SPEC_VERSION.to_string(),
            event_type: "deploy".to_string(),
            time: Utc::now(),
            datacontenttype: JSON_CONTENT_TYPE.to_string(),
            extensions,
            data,
        }
    }

    #[test]
    fn envelope_serializes_as_structured_cloud_event() {
        let envelope = sample_envelope(EventPayload::with_message("app.example.com"));
        let json = serde_json::to_value(&envelope).unwrap();

        assert_eq!(json["specversion"], "1.0");
        assert_eq!(json["type"], "deploy");
        assert_eq!(json["source"], "cluster-onboarding");
        assert_eq!(json["datacontenttype"], "application/json");
        // Extensions are flattened next to the context attributes.
        assert_eq!(json["workflow-process-ref-id"], "wf-42");
        assert!(json.get("extensions").is_none());
        assert_eq!(json["data"]["message"], "app.example.com");
        assert!(json["data"].get("error").is_none());
    }

    #[test]
    fn envelope_deserializes_extensions_back_into_map() {
        let envelope = sample_envelope(EventPayload::with_error("boom"));
        let json = serde_json::to_string(&envelope).unwrap();
        let parsed: EventEnvelope = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, envelope);
        assert_eq!(parsed.workflow_id(), Some("wf-42"));
    }

    #[test]
    fn payload_constructors_set_one_field() {
        let msg = EventPayload::with_message("hello");
        assert_eq!(msg.message.as_deref(), Some("hello"));
        assert!(msg.error.is_none());

        let err = EventPayload::with_error("failed");
        assert_eq!(err.error.as_deref(), Some("failed"));
        assert!(err.message.is_none());

        assert!(EventPayload::empty().is_empty());
        assert_eq!(serde_json::to_string(&EventPayload::empty()).unwrap(), "{}");
    }

    #[test]
    fn lifecycle_signal_serde_tagging() {
        let signal = LifecycleSignal::Failed {
            error: "timeout".to_string(),
        };
        let json = serde_json::to_value(&signal).unwrap();
        assert_eq!(json["signal"], "failed");
        assert_eq!(json["error"], "timeout");

        let started: LifecycleSignal = serde_json::from_str(r#"{"signal":"started"}"#).unwrap();
        assert_eq!(started, LifecycleSignal::Started);
    }
}
