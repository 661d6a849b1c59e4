//! Event builder function endpoints.
//!
//! Each endpoint returns the built CloudEvent; publishing it is left to the
//! caller.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::Deserialize;

use flowtools_types::event::{EventEnvelope, EventPayload, LifecycleSignal};

use crate::http::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRequest {
    pub workflow_id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub source: String,
    #[serde(default)]
    pub data: EventPayload,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployEventRequest {
    pub workflow_id: String,
    pub app_host: String,
    pub source: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEventRequest {
    pub workflow_id: String,
    pub message: String,
    pub source: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifecycleEventRequest {
    pub workflow_id: String,
    pub source: String,
    #[serde(flatten)]
    pub signal: LifecycleSignal,
}

/// POST /api/v1/events
pub async fn create_event(
    State(state): State<AppState>,
    payload: Result<Json<EventRequest>, JsonRejection>,
) -> Result<Json<EventEnvelope>, AppError> {
    let Json(req) = payload?;
    Ok(Json(state.events.build_event(
        &req.workflow_id,
        req.data,
        &req.event_type,
        &req.source,
    )))
}

/// POST /api/v1/events/deploy
pub async fn create_deploy_event(
    State(state): State<AppState>,
    payload: Result<Json<DeployEventRequest>, JsonRejection>,
) -> Result<Json<EventEnvelope>, AppError> {
    let Json(req) = payload?;
    Ok(Json(state.events.build_deploy_event(
        &req.workflow_id,
        &req.app_host,
        &req.source,
    )))
}

/// POST /api/v1/events/error
pub async fn create_error_event(
    State(state): State<AppState>,
    payload: Result<Json<ErrorEventRequest>, JsonRejection>,
) -> Result<Json<EventEnvelope>, AppError> {
    let Json(req) = payload?;
    Ok(Json(state.events.build_error_event(
        &req.workflow_id,
        &req.message,
        &req.source,
    )))
}

/// POST /api/v1/events/lifecycle
pub async fn create_lifecycle_event(
    State(state): State<AppState>,
    payload: Result<Json<LifecycleEventRequest>, JsonRejection>,
) -> Result<Json<EventEnvelope>, AppError> {
    let Json(req) = payload?;
    Ok(Json(state.events.build_lifecycle_event(
        &req.workflow_id,
        &req.signal,
        &req.source,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::tests::test_state;

    #[tokio::test]
    async fn deploy_endpoint_builds_deploy_event() {
        let req = DeployEventRequest {
            workflow_id: "wf-1".to_string(),
            app_host: "app.example.com".to_string(),
            source: "onboarding".to_string(),
        };
        let Json(event) = create_deploy_event(State(test_state()), Ok(Json(req)))
            .await
            .unwrap();

        assert_eq!(event.event_type, "transformation-saved");
        assert_eq!(event.data.message.as_deref(), Some("app.example.com"));
        assert_eq!(event.workflow_id(), Some("wf-1"));
    }

    #[tokio::test]
    async fn error_endpoint_builds_error_event() {
        let req = ErrorEventRequest {
            workflow_id: "wf-2".to_string(),
            message: "apply failed".to_string(),
            source: "terraform".to_string(),
        };
        let Json(event) = create_error_event(State(test_state()), Ok(Json(req)))
            .await
            .unwrap();

        assert_eq!(event.event_type, "workflow-error");
        assert_eq!(event.data.error.as_deref(), Some("apply failed"));
    }

    #[tokio::test]
    async fn generic_endpoint_defaults_to_empty_payload() {
        let req: EventRequest = serde_json::from_str(
            r#"{"workflowId":"wf-3","type":"cluster.ready","source":"src"}"#,
        )
        .unwrap();
        let Json(event) = create_event(State(test_state()), Ok(Json(req)))
            .await
            .unwrap();

        assert_eq!(event.event_type, "cluster.ready");
        assert!(event.data.is_empty());
    }

    #[tokio::test]
    async fn lifecycle_endpoint_parses_flattened_signal() {
        let req: LifecycleEventRequest = serde_json::from_str(
            r#"{"workflowId":"wf-4","source":"src","signal":"completed","message":"host"}"#,
        )
        .unwrap();
        let Json(event) = create_lifecycle_event(State(test_state()), Ok(Json(req)))
            .await
            .unwrap();

        assert_eq!(event.event_type, "transformation-saved");
        assert_eq!(event.data.message.as_deref(), Some("host"));
    }
}
