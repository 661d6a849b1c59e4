//! Workflow notification events.
//!
//! - `builder` -- `EventBuilder` producing CloudEvent envelopes from configured names

pub mod builder;

pub use builder::EventBuilder;
