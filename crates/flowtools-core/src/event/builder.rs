//! Constructors for workflow `EventEnvelope`s.
//!
//! `EventBuilder` holds the event names resolved at startup and stamps each
//! envelope with a fresh id, the current time, and the workflow identifier
//! extension. No I/O and no validation of caller-supplied types or sources.

use std::collections::BTreeMap;

use chrono::Utc;
use uuid::Uuid;

use flowtools_types::config::EventNames;
use flowtools_types::event::{
    CLOUD_EVENTS_SPEC_VERSION, EventEnvelope, EventPayload, JSON_CONTENT_TYPE, LifecycleSignal,
    WORKFLOW_PROCESS_REF_ID,
};

/// Builds event envelopes for the workflow engine's notification channel.
#[derive(Debug, Clone)]
pub struct EventBuilder {
    names: EventNames,
}

impl EventBuilder {
    pub fn new(names: EventNames) -> Self {
        Self { names }
    }

    /// The configured event names.
    pub fn names(&self) -> &EventNames {
        &self.names
    }

    /// Build an envelope of an arbitrary type carrying `payload`.
    pub fn build_event(
        &self,
        workflow_id: &str,
        payload: EventPayload,
        event_type: &str,
        source: &str,
    ) -> EventEnvelope {
        let mut extensions = BTreeMap::new();
        extensions.insert(WORKFLOW_PROCESS_REF_ID.to_string(), workflow_id.to_string());

        EventEnvelope {
            id: Uuid::new_v4(),
            source: source.to_string(),
            specversion: CLOUD_EVENTS_SPEC_VERSION.to_string(),
            event_type: event_type.to_string(),
            time: Utc::now(),
            datacontenttype: JSON_CONTENT_TYPE.to_string(),
            extensions,
            data: payload,
        }
    }

    /// Build an envelope of an arbitrary type with an empty payload.
    pub fn build_empty_event(&self, workflow_id: &str, event_type: &str, source: &str) -> EventEnvelope {
        self.build_event(workflow_id, EventPayload::empty(), event_type, source)
    }

    /// Build a deploy event whose message is the deployed application host.
    pub fn build_deploy_event(&self, workflow_id: &str, app_host: &str, source: &str) -> EventEnvelope {
        self.build_event(
            workflow_id,
            EventPayload::with_message(app_host),
            &self.names.deploy,
            source,
        )
    }

    /// Build an error event carrying `message` as the payload error.
    pub fn build_error_event(&self, workflow_id: &str, message: &str, source: &str) -> EventEnvelope {
        self.build_event(
            workflow_id,
            EventPayload::with_error(message),
            &self.names.error,
            source,
        )
    }

    /// Map a lifecycle signal onto the configured event names.
    ///
    /// `Started` uses the started name when one is configured and the deploy
    /// name otherwise, always with an empty payload.
    pub fn build_lifecycle_event(
        &self,
        workflow_id: &str,
        signal: &LifecycleSignal,
        source: &str,
    ) -> EventEnvelope {
        match signal {
            LifecycleSignal::Started => {
                let event_type = self.names.started.as_deref().unwrap_or(self.names.deploy.as_str());
                self.build_empty_event(workflow_id, event_type, source)
            }
            LifecycleSignal::Completed { message } => {
                self.build_deploy_event(workflow_id, message, source)
            }
            LifecycleSignal::Failed { error } => self.build_error_event(workflow_id, error, source),
        }
    }
}
