//! Business logic and port definitions for flowtools.
//!
//! This crate builds workflow event envelopes and defines the `FileRelay`
//! port that the infrastructure layer implements. It depends only on
//! `flowtools-types` -- never on `flowtools-infra` or any HTTP crate.

pub mod event;
pub mod relay;
