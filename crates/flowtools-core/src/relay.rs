//! File relay port and the workflow step built on top of it.
//!
//! `FileRelay` is implemented in `flowtools-infra` (`HttpFileRelay`). The
//! relay itself only reports what the destination said; [`run_relay_step`]
//! is the host-side wrapper that decides whether the outcome warrants an
//! error event for the workflow.

use flowtools_types::event::EventEnvelope;
use flowtools_types::relay::RelayResult;

use crate::event::EventBuilder;

/// Moves the bytes of one HTTP resource to another.
///
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
/// Implementations never fail: every fault is folded into the returned
/// [`RelayResult`].
pub trait FileRelay: Send + Sync {
    fn relay(
        &self,
        source_url: &str,
        destination_url: &str,
    ) -> impl std::future::Future<Output = RelayResult> + Send;
}

/// Result of a relay step run on behalf of a workflow instance.
#[derive(Debug, Clone)]
pub struct RelayReport {
    pub result: RelayResult,
    /// Error event to publish upstream, present when the destination did not
    /// answer with a 2xx status.
    pub error_event: Option<EventEnvelope>,
}

impl RelayReport {
    pub fn succeeded(&self) -> bool {
        self.error_event.is_none()
    }
}

/// Run a relay and build an error event for `workflow_id` if it did not
/// succeed.
///
/// The event message is the destination's error body when it supplied one,
/// otherwise the `Display` form of the result.
pub async fn run_relay_step<R: FileRelay>(
    relay: &R,
    events: &EventBuilder,
    workflow_id: &str,
    event_source: &str,
    source_url: &str,
    destination_url: &str,
) -> RelayReport {
    let result = relay.relay(source_url, destination_url).await;

    if result.is_success_status() {
        tracing::debug!(workflow_id, status = result.status_code, "relay step succeeded");
        return RelayReport {
            result,
            error_event: None,
        };
    }

    let message = if result.error_message.is_empty() {
        result.to_string()
    } else {
        result.error_message.clone()
    };
    tracing::warn!(
        workflow_id,
        status = result.status_code,
        error = %message,
        "relay step failed, emitting error event"
    );
    let error_event = events.build_error_event(workflow_id, &message, event_source);

    RelayReport {
        result,
        error_event: Some(error_event),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use flowtools_types::config::EventNames;

    /// Relay stub returning a canned result and recording its calls.
    struct StubRelay {
        result: RelayResult,
        calls: Mutex<Vec<(String, String)>>,
    }

    impl StubRelay {
        fn returning(result: RelayResult) -> Self {
            Self {
                result,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    impl FileRelay for StubRelay {
        async fn relay(&self, source_url: &str, destination_url: &str) -> RelayResult {
            self.calls
                .lock()
                .unwrap()
                .push((source_url.to_string(), destination_url.to_string()));
            self.result.clone()
        }
    }

    fn events() -> EventBuilder {
        EventBuilder::new(EventNames::new("error", "deploy"))
    }

    #[tokio::test]
    async fn successful_relay_emits_no_event() {
        let relay = StubRelay::returning(RelayResult::new(201));
        let report = run_relay_step(&relay, &events(), "wf-1", "terraform", "http://a", "http://b").await;

        assert!(report.succeeded());
        assert_eq!(report.result.status_code, 201);
        assert_eq!(
            relay.calls.lock().unwrap().as_slice(),
            &[("http://a".to_string(), "http://b".to_string())]
        );
    }

    #[tokio::test]
    async fn rejected_relay_emits_error_event_with_server_body() {
        let relay = StubRelay::returning(RelayResult::with_error(403, "forbidden"));
        let report = run_relay_step(&relay, &events(), "wf-2", "terraform", "http://a", "http://b").await;

        let event = report.error_event.expect("error event");
        assert_eq!(event.event_type, "error");
        assert_eq!(event.workflow_id(), Some("wf-2"));
        assert_eq!(event.data.error.as_deref(), Some("forbidden"));
        assert_eq!(event.source, "terraform");
    }

    #[tokio::test]
    async fn rejection_without_body_uses_result_display() {
        let relay = StubRelay::returning(RelayResult::new(500));
        let report = run_relay_step(&relay, &events(), "wf-3", "src", "http://a", "http://b").await;

        let event = report.error_event.expect("error event");
        assert_eq!(
            event.data.error.as_deref(),
            Some("RelayResult [statusCode=500, errorMessage=]")
        );
    }

    #[tokio::test]
    async fn pre_transfer_failure_emits_error_event() {
        let relay = StubRelay::returning(RelayResult::pre_transfer_failure());
        let report = run_relay_step(&relay, &events(), "wf-4", "src", "bad", "http://b").await;

        assert!(!report.succeeded());
        assert_eq!(
            report.error_event.unwrap().data.error.as_deref(),
            Some("error unrelated to HTTP connection")
        );
    }
}
