//! Logging setup shared by all Flockpost binaries
//!
//! Binaries call [`init_default`] (or [`init_with`] when they carry a
//! verbose flag) once at startup. Output always goes to stderr so stdout
//! stays clean for command results. `FLOCKPOST_LOG_FORMAT` and
//! `FLOCKPOST_LOG_LEVEL` override the config file defaults; `RUST_LOG`
//! wins over both when set.

use std::str::FromStr;

use crate::config::LoggingDefaults;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Plain text, no colors, suitable for piping
    Text,
    /// One JSON object per line
    Json,
    /// Colored multi-line output for development
    Pretty,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            _ => Err(format!(
                "Invalid log format: '{}'. Valid options: text, json, pretty",
                s
            )),
        }
    }
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Text => write!(f, "text"),
            LogFormat::Json => write!(f, "json"),
            LogFormat::Pretty => write!(f, "pretty"),
        }
    }
}

/// Install the global subscriber.
///
/// `verbose` forces debug level unless `RUST_LOG` is set.
///
/// # Panics
///
/// Panics if a subscriber has already been installed.
pub fn init(format: LogFormat, level: &str, verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let fallback = if verbose { "debug" } else { level };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    match format {
        LogFormat::Json => {
            tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_current_span(true)
                .flatten_event(true)
                .with_target(true)
                .init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::fmt()
                .pretty()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_line_number(true)
                .with_file(true)
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
    }
}

/// Resolve format and level from config defaults plus environment
/// overrides, then install the subscriber.
pub fn init_with(defaults: &LoggingDefaults, verbose: bool) {
    let format = std::env::var("FLOCKPOST_LOG_FORMAT")
        .ok()
        .and_then(|s| s.parse().ok())
        .or_else(|| defaults.format.parse().ok())
        .unwrap_or(LogFormat::Text);

    let level =
        std::env::var("FLOCKPOST_LOG_LEVEL").unwrap_or_else(|_| defaults.level.clone());

    init(format, &level, verbose);
}

/// Environment-driven setup with built-in defaults (text, info).
pub fn init_default() {
    init_with(&LoggingDefaults::default(), false);
}
