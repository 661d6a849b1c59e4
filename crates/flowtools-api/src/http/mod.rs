//! HTTP function endpoints for flowtools.
//!
//! Axum-based endpoints under `/api/v1/` that expose the relay and the event
//! builder to workflow engines calling out over HTTP.

pub mod error;
pub mod handlers;
pub mod router;
