use thiserror::Error;

/// Errors raised while loading configuration at startup.
///
/// All of these are fatal: the process cannot build events without the
/// configured names.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("required configuration value '{0}' is missing")]
    MissingEventName(&'static str),

    #[error("failed to read config file '{path}': {reason}")]
    Read { path: String, reason: String },

    #[error("failed to parse config file '{path}': {reason}")]
    Parse { path: String, reason: String },
}

/// Internal failures of a relay stage that produced no destination status.
///
/// Never surfaced to relay callers directly; the relay converts these into a
/// sentinel `RelayResult` after logging them.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("source request failed: {0}")]
    Source(String),

    #[error("transfer to destination failed: {0}")]
    Transfer(String),

    #[error("failed to build HTTP client: {0}")]
    Client(String),
}
