//! flowtools CLI and function endpoint server.
//!
//! Binary name: `flowtools`
//!
//! Parses CLI arguments, loads configuration (failing fast when the event
//! names are missing), then dispatches to the command handler or starts the
//! HTTP server.

mod cli;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;

use cli::{Cli, Commands, ExitStatus};
use flowtools_observe::tracing_setup::{filter_for_verbosity, init_tracing, shutdown_tracing};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(filter_for_verbosity(cli.verbose, cli.quiet), cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let outcome = run(cli).await;
    shutdown_tracing();

    if outcome? == ExitStatus::Failure {
        std::process::exit(1);
    }
    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<ExitStatus> {
    let config_path = cli.config.as_deref();

    // Commands that must work without a usable configuration
    match &cli.command {
        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            generate(*shell, &mut cmd, "flowtools", &mut std::io::stdout());
            return Ok(ExitStatus::Success);
        }
        Commands::Config => {
            cli::config::show(config_path, cli.json).await?;
            return Ok(ExitStatus::Success);
        }
        _ => {}
    }

    let state = AppState::init(config_path).await?;

    match cli.command {
        Commands::Event { kind } => {
            cli::event::emit(&state, kind, cli.json)?;
        }

        Commands::Relay {
            source_url,
            destination_url,
            workflow_id,
            event_source,
        } => {
            return cli::relay::relay(
                &state,
                &source_url,
                &destination_url,
                workflow_id.as_deref(),
                &event_source,
                cli.json,
            )
            .await;
        }

        Commands::Serve { port, host } => {
            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            if !cli.quiet {
                println!(
                    "  {} flowtools functions listening on {}",
                    console::style("⚡").bold(),
                    console::style(format!("http://{addr}/api/v1")).cyan()
                );
                println!("  {}", console::style("Press Ctrl+C to stop").dim());
            }
            tracing::info!(%addr, "function server started");

            let router = http::router::build_router(state);
            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            if !cli.quiet {
                println!("\n  Server stopped.");
            }
        }

        Commands::Config | Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(ExitStatus::Success)
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
