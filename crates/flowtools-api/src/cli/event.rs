//! `flowtools event` commands: build an envelope and print it.

use anyhow::Result;

use flowtools_types::event::{EventEnvelope, EventPayload, LifecycleSignal};

use crate::cli::{EventCommand, SignalArg};
use crate::state::AppState;

/// Build the envelope described by `command`.
pub fn build(state: &AppState, command: EventCommand) -> EventEnvelope {
    let events = &state.events;
    match command {
        EventCommand::Deploy {
            workflow_id,
            app_host,
            source,
        } => events.build_deploy_event(&workflow_id, &app_host, &source),
        EventCommand::Error {
            workflow_id,
            message,
            source,
        } => events.build_error_event(&workflow_id, &message, &source),
        EventCommand::Custom {
            workflow_id,
            event_type,
            source,
            message,
            error,
        } => {
            let payload = EventPayload { error, message };
            events.build_event(&workflow_id, payload, &event_type, &source)
        }
        EventCommand::Lifecycle {
            workflow_id,
            signal,
            source,
            detail,
        } => {
            let signal = match signal {
                SignalArg::Started => LifecycleSignal::Started,
                SignalArg::Completed => LifecycleSignal::Completed { message: detail },
                SignalArg::Failed => LifecycleSignal::Failed { error: detail },
            };
            events.build_lifecycle_event(&workflow_id, &signal, &source)
        }
    }
}

/// Build and print an event. Always JSON; `--json` makes it compact.
pub fn emit(state: &AppState, command: EventCommand, json: bool) -> Result<()> {
    let envelope = build(state, command);
    tracing::info!(id = %envelope.id, event_type = %envelope.event_type, "event built");
    println!("{}", render(&envelope, json)?);
    Ok(())
}

pub fn render(envelope: &EventEnvelope, compact: bool) -> Result<String> {
    let rendered = if compact {
        serde_json::to_string(envelope)?
    } else {
        serde_json::to_string_pretty(envelope)?
    };
    Ok(rendered)
}
