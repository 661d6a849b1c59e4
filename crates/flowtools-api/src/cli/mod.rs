//! CLI command definitions and dispatch for the `flowtools` binary.
//!
//! Uses clap derive macros for argument parsing. Commands follow a verb-noun
//! pattern (e.g., `flowtools event deploy`, `flowtools relay`).

pub mod config;
pub mod event;
pub mod relay;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

/// Workflow glue: lifecycle CloudEvents and streaming file relay.
#[derive(Parser)]
#[command(name = "flowtools", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output compact machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    /// Path to a config file (defaults to `$FLOWTOOLS_DATA_DIR/config.toml`).
    #[arg(long, global = true, env = "FLOWTOOLS_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a workflow notification event and print it.
    Event {
        #[command(subcommand)]
        kind: EventCommand,
    },

    /// Stream a file from one URL to another (GET then PUT).
    Relay {
        /// URL to download the file from.
        source_url: String,

        /// URL to upload the file to with an HTTP PUT.
        destination_url: String,

        /// Workflow instance to report a failure for. When set, a failed
        /// relay also prints an error event.
        #[arg(long)]
        workflow_id: Option<String>,

        /// Source attribute of the error event.
        #[arg(long, default_value = "flowtools-relay")]
        event_source: String,
    },

    /// Start the HTTP function endpoint server.
    Serve {
        /// Port to listen on.
        #[arg(short, long, default_value = "8080")]
        port: u16,

        /// Host to bind to.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },

    /// Show the resolved configuration.
    Config,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum EventCommand {
    /// Deployment saved: message is the application host.
    Deploy {
        workflow_id: String,
        app_host: String,
        /// Event source attribute.
        #[arg(long)]
        source: String,
    },

    /// Workflow error.
    Error {
        workflow_id: String,
        message: String,
        /// Event source attribute.
        #[arg(long)]
        source: String,
    },

    /// Event of an arbitrary type.
    Custom {
        workflow_id: String,
        /// CloudEvent `type` attribute.
        event_type: String,
        /// Event source attribute.
        #[arg(long)]
        source: String,
        /// Payload message.
        #[arg(long)]
        message: Option<String>,
        /// Payload error.
        #[arg(long)]
        error: Option<String>,
    },

    /// Lifecycle signal mapped onto the configured event names.
    Lifecycle {
        workflow_id: String,
        signal: SignalArg,
        /// Event source attribute.
        #[arg(long)]
        source: String,
        /// Message for `completed`, error text for `failed`.
        #[arg(long, default_value = "")]
        detail: String,
    },
}

/// Lifecycle signal names accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SignalArg {
    Started,
    Completed,
    Failed,
}

/// How the process should exit after a command ran without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Failure,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        <Cli as clap::CommandFactory>::command().debug_assert();
    }

    #[test]
    fn parses_relay_with_workflow_id() {
        let cli = Cli::try_parse_from([
            "flowtools",
            "relay",
            "http://src/a.tar",
            "http://dst/a.tar",
            "--workflow-id",
            "wf-1",
        ])
        .unwrap();

        match cli.command {
            Commands::Relay {
                source_url,
                destination_url,
                workflow_id,
                event_source,
            } => {
                assert_eq!(source_url, "http://src/a.tar");
                assert_eq!(destination_url, "http://dst/a.tar");
                assert_eq!(workflow_id.as_deref(), Some("wf-1"));
                assert_eq!(event_source, "flowtools-relay");
            }
            _ => panic!("expected relay command"),
        }
    }

    #[test]
    fn parses_event_deploy_with_global_flags() {
        let cli = Cli::try_parse_from([
            "flowtools",
            "event",
            "deploy",
            "wf-2",
            "app.example.com",
            "--source",
            "onboarding",
            "--json",
            "-vv",
        ])
        .unwrap();

        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(
            cli.command,
            Commands::Event {
                kind: EventCommand::Deploy { ref workflow_id, ref app_host, ref source }
            } if workflow_id == "wf-2" && app_host == "app.example.com" && source == "onboarding"
        ));
    }

    #[test]
    fn event_source_is_required() {
        let result = Cli::try_parse_from(["flowtools", "event", "error", "wf", "boom"]);
        assert!(result.is_err());
    }

    #[test]
    fn parses_lifecycle_signal() {
        let cli = Cli::try_parse_from([
            "flowtools",
            "event",
            "lifecycle",
            "wf-3",
            "failed",
            "--source",
            "src",
            "--detail",
            "timeout",
        ])
        .unwrap();

        match cli.command {
            Commands::Event {
                kind: EventCommand::Lifecycle { signal, detail, .. },
            } => {
                assert_eq!(signal, SignalArg::Failed);
                assert_eq!(detail, "timeout");
            }
            _ => panic!("expected lifecycle command"),
        }
    }

    #[test]
    fn serve_defaults() {
        let cli = Cli::try_parse_from(["flowtools", "serve"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Serve { port: 8080, ref host } if host == "127.0.0.1"
        ));
    }
}
