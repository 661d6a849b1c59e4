//! Shared domain types for flowtools.
//!
//! This crate contains the value types passed between the flowtools crates:
//! CloudEvent envelopes for workflow notifications, relay results, the
//! configuration model, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod config;
pub mod error;
pub mod event;
pub mod relay;
