//! Configuration loader for flowtools.
//!
//! Reads `config.toml` from the data directory (`~/.flowtools/` by default)
//! or an explicit path, then applies `FLOWTOOLS_*` environment overrides.
//! Unlike most settings, the event names have no defaults: the caller must
//! resolve them (see `EventsConfig::resolve`) and abort startup on failure.

use std::path::{Path, PathBuf};

use flowtools_types::config::FlowtoolsConfig;
use flowtools_types::error::ConfigError;

/// File name looked up inside the data directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

pub const DATA_DIR_ENV: &str = "FLOWTOOLS_DATA_DIR";
pub const ERROR_EVENT_NAME_ENV: &str = "FLOWTOOLS_ERROR_EVENT_NAME";
pub const DEPLOY_EVENT_NAME_ENV: &str = "FLOWTOOLS_DEPLOY_EVENT_NAME";
pub const STARTED_EVENT_NAME_ENV: &str = "FLOWTOOLS_STARTED_EVENT_NAME";

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `FLOWTOOLS_DATA_DIR` environment variable
/// 2. `~/.flowtools`
/// 3. `.flowtools` in the current directory
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".flowtools");
    }

    PathBuf::from(".flowtools")
}

/// Load configuration, overlaying the process environment.
///
/// See [`load_config_with`] for the file lookup rules.
pub async fn load_config(
    explicit_path: Option<&Path>,
    data_dir: &Path,
) -> Result<FlowtoolsConfig, ConfigError> {
    load_config_with(explicit_path, data_dir, |key| std::env::var(key).ok()).await
}

/// Load configuration using `lookup` for environment overrides.
///
/// - An explicit path must exist and parse.
/// - Without an explicit path, a missing `{data_dir}/config.toml` yields the
///   default config (environment overrides may still supply event names).
/// - A file that exists but fails to parse is always an error.
pub async fn load_config_with<F>(
    explicit_path: Option<&Path>,
    data_dir: &Path,
    lookup: F,
) -> Result<FlowtoolsConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let config_path = explicit_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| data_dir.join(CONFIG_FILE_NAME));

    let mut config = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => toml::from_str::<FlowtoolsConfig>(&content).map_err(|err| {
            ConfigError::Parse {
                path: config_path.display().to_string(),
                reason: err.to_string(),
            }
        })?,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound && explicit_path.is_none() => {
            tracing::debug!(
                "No {CONFIG_FILE_NAME} found at {}, relying on environment",
                config_path.display()
            );
            FlowtoolsConfig::default()
        }
        Err(err) => {
            return Err(ConfigError::Read {
                path: config_path.display().to_string(),
                reason: err.to_string(),
            });
        }
    };

    apply_env_overrides(&mut config, lookup);
    Ok(config)
}

/// Overwrite event names with any values found through `lookup`.
pub fn apply_env_overrides<F>(config: &mut FlowtoolsConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let events = &mut config.events;
    for (key, slot) in [
        (ERROR_EVENT_NAME_ENV, &mut events.error_event_name),
        (DEPLOY_EVENT_NAME_ENV, &mut events.deploy_event_name),
        (STARTED_EVENT_NAME_ENV, &mut events.started_event_name),
    ] {
        if let Some(value) = lookup(key) {
            tracing::debug!(key, "event name overridden from environment");
            *slot = Some(value);
        }
    }
}
