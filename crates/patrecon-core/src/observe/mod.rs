//! # Observability
//!
//! Structured logging for the reconstruction pipeline. Pipeline stages emit
//! `tracing` events (`debug` stage summaries, `warn` for slice divergence);
//! this module installs the subscriber that renders them.

pub mod logging;

pub use logging::{init_logging, LogConfig, LogFormat, LogLevel};
