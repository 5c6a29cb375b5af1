//! Logging infrastructure for graph loading and layout
//!
//! This module provides structured logging using the `tracing` crate with
//! configurable log levels and formats.
//!
//! # Usage
//!
//! ```rust,no_run
//! use peoplegraph::core::logging::init_logging;
//!
//! // Initialize with default settings
//! init_logging(None, None).unwrap();
//! ```
//!
//! # Log Formats
//!
//! - `compact`: Single-line format, good for production
//! - `pretty`: Multi-line format with colors, good for development
//! - `json`: JSON format, good for log aggregation systems
//!
//! # Environment Variables
//!
//! - `PEOPLEGRAPH_LOG_LEVEL`: Set log level (trace|debug|info|warn|error)
//! - `PEOPLEGRAPH_LOG_FORMAT`: Set log format (compact|pretty|json)
//! - `RUST_LOG`: Standard `tracing-subscriber` filter, wins over the level
//!
//! # Filtering Logs
//!
//! ```bash
//! # Show all logs at info level, but ranking at trace level
//! RUST_LOG="info,peoplegraph::graph::ranking=trace" peoplegraph layout -i graph.json
//! ```

use std::str::FromStr;

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Registry,
};

/// Environment variable holding the log level
pub const LOG_LEVEL_ENV: &str = "PEOPLEGRAPH_LOG_LEVEL";

/// Environment variable holding the log format
pub const LOG_FORMAT_ENV: &str = "PEOPLEGRAPH_LOG_FORMAT";

/// Log format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Compact single-line format
    Compact,
    /// Pretty multi-line format with colors
    Pretty,
    /// JSON format for log aggregation
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Unknown log format: {}", s)),
        }
    }
}

impl LogFormat {
    /// Get all valid format names
    pub fn variants() -> &'static [&'static str] {
        &["compact", "pretty", "json"]
    }
}

/// Log level and format after arguments, environment and defaults are applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub level: String,
    pub format: LogFormat,
}

impl LogSettings {
    /// Resolve the settings for one process
    ///
    /// Arguments win over `PEOPLEGRAPH_LOG_LEVEL` / `PEOPLEGRAPH_LOG_FORMAT`.
    /// The level then falls back to `RUST_LOG` and `info`, the format to
    /// `compact`.
    pub fn resolve(level: Option<&str>, format: Option<&str>) -> Result<Self, String> {
        let level = level
            .map(|s| s.to_string())
            .or_else(|| std::env::var(LOG_LEVEL_ENV).ok())
            .or_else(|| std::env::var("RUST_LOG").ok())
            .unwrap_or_else(|| "info".to_string());

        let format = format
            .map(|s| s.to_string())
            .or_else(|| std::env::var(LOG_FORMAT_ENV).ok())
            .unwrap_or_else(|| "compact".to_string());
        let format =
            LogFormat::from_str(&format).map_err(|e| format!("Invalid log format: {}", e))?;

        Ok(Self { level, format })
    }

    /// Event filter for the resolved level
    ///
    /// `off` silences everything even when `RUST_LOG` is set. Otherwise
    /// `RUST_LOG` wins, and an unparsable level becomes `info`.
    pub fn filter(&self) -> EnvFilter {
        if self.level == "off" {
            return EnvFilter::new("off");
        }
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.level))
            .unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

/// Initialize the tracing subscriber with the given log level and format
///
/// See [`LogSettings::resolve`] for how missing arguments are filled in.
/// Logs go to stderr so that layout JSON on stdout stays clean.
///
/// Returns an error for an unknown format or when a global subscriber is
/// already installed.
pub fn init_logging(
    level: Option<&str>,
    format: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    // Validate the format before touching the global subscriber
    let settings = LogSettings::resolve(level, format)?;
    let filter = settings.filter();

    match settings.format {
        LogFormat::Compact => {
            Registry::default()
                .with(filter)
                .with(
                    fmt::Layer::default()
                        .with_writer(std::io::stderr)
                        .with_target(false)
                        .with_level(true)
                        .with_span_events(FmtSpan::NONE),
                )
                .try_init()?;
        }
        LogFormat::Pretty => {
            Registry::default()
                .with(filter)
                .with(
                    fmt::Layer::default()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_level(true)
                        .with_file(true)
                        .with_line_number(true)
                        .with_span_events(FmtSpan::ACTIVE)
                        .pretty(),
                )
                .try_init()?;
        }
        LogFormat::Json => {
            Registry::default()
                .with(filter)
                .with(
                    fmt::Layer::default()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_level(true)
                        .with_span_events(FmtSpan::CLOSE)
                        .json(),
                )
                .try_init()?;
        }
    }

    Ok(())
}

/// Initialize logging with default settings (info level, compact format)
pub fn init_default_logging() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(None, None)
}
