//! File relay function endpoint.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::{Deserialize, Serialize};

use flowtools_core::relay::{FileRelay, run_relay_step};
use flowtools_types::event::EventEnvelope;
use flowtools_types::relay::RelayResult;

use crate::http::error::AppError;
use crate::state::AppState;

/// Event source used for error events when the request names none.
const DEFAULT_EVENT_SOURCE: &str = "flowtools-relay";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayRequest {
    pub source_url: String,
    pub destination_url: String,
    /// When set, a failed relay also returns an error event for this workflow.
    #[serde(default)]
    pub workflow_id: Option<String>,
    #[serde(default)]
    pub event_source: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayResponse {
    #[serde(flatten)]
    pub result: RelayResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_event: Option<EventEnvelope>,
}

/// POST /api/v1/relay - Stream a file from `sourceUrl` to `destinationUrl`.
///
/// Always answers 200 with the relay result; the caller inspects
/// `statusCode` to decide how its workflow continues.
pub async fn relay_file(
    State(state): State<AppState>,
    payload: Result<Json<RelayRequest>, JsonRejection>,
) -> Result<Json<RelayResponse>, AppError> {
    let Json(request) = payload?;

    let response = match request.workflow_id.as_deref() {
        Some(workflow_id) => {
            let event_source = request
                .event_source
                .as_deref()
                .unwrap_or(DEFAULT_EVENT_SOURCE);
            let report = run_relay_step(
                state.relay.as_ref(),
                &state.events,
                workflow_id,
                event_source,
                &request.source_url,
                &request.destination_url,
            )
            .await;
            RelayResponse {
                result: report.result,
                error_event: report.error_event,
            }
        }
        None => RelayResponse {
            result: state
                .relay
                .relay(&request.source_url, &request.destination_url)
                .await,
            error_event: None,
        },
    };

    Ok(Json(response))
}
