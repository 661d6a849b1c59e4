//! Application state wiring the builder and relay together.
//!
//! AppState is created once at startup and shared by CLI commands and HTTP
//! handlers. Building it resolves the event names, so a process with
//! missing event configuration never gets past initialization.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use flowtools_core::event::EventBuilder;
use flowtools_infra::config::{load_config, resolve_data_dir};
use flowtools_infra::relay::HttpFileRelay;
use flowtools_types::config::FlowtoolsConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<FlowtoolsConfig>,
    pub events: Arc<EventBuilder>,
    pub relay: Arc<HttpFileRelay>,
}

impl AppState {
    /// Load configuration from disk/environment and wire services.
    pub async fn init(config_path: Option<&Path>) -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        let config = load_config(config_path, &data_dir)
            .await
            .context("failed to load configuration")?;
        Self::from_config(config)
    }

    /// Wire services from an already loaded configuration.
    pub fn from_config(config: FlowtoolsConfig) -> anyhow::Result<Self> {
        let names = config
            .events
            .resolve()
            .context("event names must be configured before startup")?;
        let relay = HttpFileRelay::new(&config.relay).context("failed to build relay client")?;

        tracing::debug!(
            error_event = %names.error,
            deploy_event = %names.deploy,
            "event names resolved"
        );

        Ok(Self {
            config: Arc::new(config),
            events: Arc::new(EventBuilder::new(names)),
            relay: Arc::new(relay),
        })
    }
}
