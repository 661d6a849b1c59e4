//! Result of a file relay invocation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome of relaying a file from a source URL to a destination URL.
///
/// `status_code` is the destination's HTTP status, or
/// [`RelayResult::SENTINEL_STATUS`] when the relay failed before any HTTP
/// status was obtainable. The relay never classifies the status; callers
/// decide what counts as success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayResult {
    pub status_code: i32,
    /// Destination-supplied error body, empty when there was none.
    #[serde(default)]
    pub error_message: String,
}

impl RelayResult {
    /// Status reported when no HTTP exchange produced a status code.
    pub const SENTINEL_STATUS: i32 = -1;

    /// Fixed message paired with [`Self::SENTINEL_STATUS`].
    pub const PRE_TRANSFER_MESSAGE: &'static str = "error unrelated to HTTP connection";

    /// A result with the given status and no error message.
    pub fn new(status_code: i32) -> Self {
        Self {
            status_code,
            error_message: String::new(),
        }
    }

    pub fn with_error(status_code: i32, error_message: impl Into<String>) -> Self {
        Self {
            status_code,
            error_message: error_message.into(),
        }
    }

    /// The result for failures before any HTTP status was available.
    pub fn pre_transfer_failure() -> Self {
        Self::with_error(Self::SENTINEL_STATUS, Self::PRE_TRANSFER_MESSAGE)
    }

    pub fn is_pre_transfer_failure(&self) -> bool {
        self.status_code == Self::SENTINEL_STATUS
    }

    /// Whether the destination answered with a 2xx status.
    ///
    /// Convenience for callers branching on the result; the relay itself
    /// never consults this.
    pub fn is_success_status(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

impl fmt::Display for RelayResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RelayResult [statusCode={}, errorMessage={}]",
            self.status_code, self.error_message
        )
    }
}
