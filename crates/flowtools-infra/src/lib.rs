//! Infrastructure layer for flowtools.
//!
//! Contains the implementations behind the ports defined in `flowtools-core`:
//! the streaming HTTP file relay (reqwest download, hyper upload) and the
//! TOML/environment config loader.

pub mod config;
pub mod relay;
