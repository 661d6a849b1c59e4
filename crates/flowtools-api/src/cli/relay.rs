//! `flowtools relay` command.

use anyhow::Result;
use console::style;

use flowtools_core::relay::{FileRelay, RelayReport, run_relay_step};
use flowtools_types::relay::RelayResult;

use crate::cli::ExitStatus;
use crate::cli::event::render;
use crate::state::AppState;

/// Relay `source_url` to `destination_url` and print the outcome.
///
/// With a workflow id, a failed relay also prints the error event to publish
/// upstream. Exits non-zero unless the destination answered 2xx.
pub async fn relay(
    state: &AppState,
    source_url: &str,
    destination_url: &str,
    workflow_id: Option<&str>,
    event_source: &str,
    json: bool,
) -> Result<ExitStatus> {
    let report = match workflow_id {
        Some(workflow_id) => {
            run_relay_step(
                state.relay.as_ref(),
                &state.events,
                workflow_id,
                event_source,
                source_url,
                destination_url,
            )
            .await
        }
        None => {
            let result = state.relay.relay(source_url, destination_url).await;
            RelayReport {
                result,
                error_event: None,
            }
        }
    };

    if json {
        println!("{}", serde_json::to_string(&report.result)?);
        if let Some(event) = &report.error_event {
            println!("{}", render(event, true)?);
        }
    } else {
        print_styled(&report.result);
        if let Some(event) = &report.error_event {
            println!("  {}", style("Error event:").dim());
            println!("{}", render(event, false)?);
            println!();
        }
    }

    Ok(if report.result.is_success_status() {
        ExitStatus::Success
    } else {
        ExitStatus::Failure
    })
}

fn print_styled(result: &RelayResult) {
    println!();
    if result.is_success_status() {
        println!(
            "  {} Relayed, destination answered {}",
            style("✓").green(),
            style(result.status_code).bold()
        );
    } else if result.is_pre_transfer_failure() {
        println!(
            "  {} Relay failed before the destination answered: {}",
            style("✗").red(),
            result.error_message
        );
    } else {
        println!(
            "  {} Destination answered {}",
            style("✗").red(),
            style(result.status_code).bold()
        );
        if !result.error_message.is_empty() {
            println!("  {}", style(&result.error_message).dim());
        }
    }
    println!();
}
