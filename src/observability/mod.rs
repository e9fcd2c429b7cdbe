//! Observability helpers for the Zoho client.
//!
//! Logging goes through `tracing`; this module only keeps secrets out of
//! the emitted fields.

pub mod logging;

pub use logging::*;
