//! # Structured Logging
//!
//! Provides structured logging via the `tracing` ecosystem with support for:
//!
//! - Multiple output formats (JSON, Pretty, Compact)
//! - Log level filtering
//! - Environment variable configuration (`RUST_LOG`)
//!
//! Events are written to stderr so that reconstructed patterns printed on
//! stdout stay machine-readable.
//!
//! ## Example
//!
//! ```rust,ignore
//! use patrecon_core::observe::{init_logging, LogConfig, LogFormat, LogLevel};
//!
//! let config = LogConfig {
//!     level: LogLevel::Debug,
//!     format: LogFormat::Json,
//!     ..Default::default()
//! };
//!
//! init_logging(&config);
//!
//! tracing::info!(rows = 37, cols = 73, "Reconstruction complete");
//! ```

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Log level configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level (most verbose)
    Trace,
    /// Debug level
    Debug,
    /// Info level (default)
    #[default]
    Info,
    /// Warning level
    Warn,
    /// Error level (least verbose)
    Error,
}

impl LogLevel {
    /// Level for a `-v` count: 0 → warn, 1 → info, 2 → debug, 3+ → trace.
    pub fn from_verbosity(count: u8) -> Self {
        match count {
            0 => LogLevel::Warn,
            1 => LogLevel::Info,
            2 => LogLevel::Debug,
            _ => LogLevel::Trace,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(format!("unknown log level '{}'", other)),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON format (machine-readable)
    Json,
    /// Pretty format (human-readable, multi-line)
    Pretty,
    /// Compact format (minimal, one line per event)
    #[default]
    Compact,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Log level
    pub level: LogLevel,
    /// Output format
    pub format: LogFormat,
    /// Include timestamps
    pub timestamps: bool,
    /// Include source location (file:line)
    pub source_location: bool,
    /// Include span events (enter/exit)
    pub span_events: bool,
    /// Module filter (e.g., "patrecon_core=debug")
    pub filter: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Compact,
            timestamps: true,
            source_location: false,
            span_events: false,
            filter: None,
        }
    }
}

impl LogConfig {
    /// Create a development configuration (verbose, pretty).
    pub fn development() -> Self {
        Self {
            level: LogLevel::Debug,
            format: LogFormat::Pretty,
            source_location: true,
            span_events: true,
            ..Default::default()
        }
    }

    /// Create a production configuration (JSON, minimal).
    pub fn production() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Json,
            timestamps: true,
            ..Default::default()
        }
    }

    /// Create a quiet configuration (errors only).
    pub fn quiet() -> Self {
        Self {
            level: LogLevel::Error,
            format: LogFormat::Compact,
            timestamps: false,
            ..Default::default()
        }
    }

    /// Filter directive string used by [`init_logging`].
    pub fn filter_directive(&self) -> String {
        self.filter
            .clone()
            .unwrap_or_else(|| self.level.to_string())
    }
}

/// Initialize the global logging subscriber.
///
/// This should be called once at application startup.
/// Subsequent calls will be silently ignored.
pub fn init_logging(config: &LogConfig) {
    let filter = if config.filter.is_some() {
        EnvFilter::try_new(config.filter_directive())
            .unwrap_or_else(|_| EnvFilter::new(config.level.to_string()))
    } else {
        // RUST_LOG wins over the configured level
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.level.to_string()))
    };

    let span_events = if config.span_events {
        fmt::format::FmtSpan::FULL
    } else {
        fmt::format::FmtSpan::NONE
    };

    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_file(config.source_location)
        .with_line_number(config.source_location)
        .with_span_events(span_events);

    let result = match (config.format, config.timestamps) {
        (LogFormat::Json, _) => {
            let subscriber = tracing_subscriber::registry()
                .with(filter)
                .with(layer.json());
            tracing::subscriber::set_global_default(subscriber)
        }
        (LogFormat::Pretty, _) => {
            let subscriber = tracing_subscriber::registry()
                .with(filter)
                .with(layer.pretty());
            tracing::subscriber::set_global_default(subscriber)
        }
        (LogFormat::Compact, true) => {
            let subscriber = tracing_subscriber::registry()
                .with(filter)
                .with(layer.compact());
            tracing::subscriber::set_global_default(subscriber)
        }
        (LogFormat::Compact, false) => {
            let subscriber = tracing_subscriber::registry()
                .with(filter)
                .with(layer.compact().without_time());
            tracing::subscriber::set_global_default(subscriber)
        }
    };

    // Ignore error if subscriber was already set
    let _ = result;
}
