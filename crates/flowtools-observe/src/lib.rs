//! Observability setup for flowtools: structured logging and optional
//! OpenTelemetry span export.

pub mod tracing_setup;
