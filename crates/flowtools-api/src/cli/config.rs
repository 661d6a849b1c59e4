//! `flowtools config` command: show what the process would start with.

use std::path::Path;

use anyhow::Result;
use console::style;

use flowtools_infra::config::{CONFIG_FILE_NAME, load_config, resolve_data_dir};

/// Print the resolved configuration and whether the event names are usable.
///
/// Unlike other commands this does not fail on missing event names; it
/// reports them instead.
pub async fn show(config_path: Option<&Path>, json: bool) -> Result<()> {
    let data_dir = resolve_data_dir();
    let source = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| data_dir.join(CONFIG_FILE_NAME));
    let config = load_config(config_path, &data_dir).await?;
    let resolved = config.events.resolve();

    if json {
        let status = serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
            "config_file": source.display().to_string(),
            "events": config.events,
            "relay": config.relay,
            "ready": resolved.is_ok(),
            "problem": resolved.as_ref().err().map(|e| e.to_string()),
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} flowtools v{}",
        style("⚡").bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!("  Config file: {}", style(source.display()).dim());
    println!();

    println!("  {}", style("── Events ──").dim());
    match &resolved {
        Ok(names) => {
            println!("  Error:   {}", style(&names.error).cyan());
            println!("  Deploy:  {}", style(&names.deploy).cyan());
            if let Some(started) = &names.started {
                println!("  Started: {}", style(started).cyan());
            }
        }
        Err(e) => println!("  {} {e}", style("✗").red()),
    }
    println!();

    println!("  {}", style("── Relay ──").dim());
    println!("  Connect timeout: {}s", config.relay.connect_timeout_secs);
    println!("  Request timeout: {}s", config.relay.request_timeout_secs);
    println!("  User agent:      {}", config.relay.user_agent);
    println!();

    Ok(())
}
