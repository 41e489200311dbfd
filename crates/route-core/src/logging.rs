//! Logging setup for route manager processes
//!
//! The route manager logs the audio HAL crates at their own level while the
//! rest of the process stays quiet. `RUST_LOG`, when set, overrides the
//! configured directives.

use crate::error::{Result, RouteError};
use serde::Deserialize;
use std::str::FromStr;
use tracing::{info, Level};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{fmt, EnvFilter};

/// Log targets that follow [`LoggingConfig::level`]
pub const HAL_TARGETS: [&str; 2] = ["halaudio_sample_core", "halaudio_route_core"];

/// Logging section of the route manager configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level for the audio HAL crates
    pub level: String,
    /// Level for every other target
    pub other_level: String,
    /// Emit JSON lines instead of plain text
    pub json: bool,
    /// Include file and line information
    pub file_info: bool,
    /// Log span activity
    pub log_spans: bool,
    /// Process name reported when logging starts
    pub process_name: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            other_level: "warn".to_string(),
            json: false,
            file_info: false,
            log_spans: false,
            process_name: "audio-route-manager".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Parse the logging section from JSON; missing fields keep their default
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Filter directives for the configured levels
    ///
    /// The global level comes first, followed by one directive per HAL target.
    pub fn filter_directives(&self) -> Result<String> {
        let level = parse_log_level(&self.level)?;
        let other_level = parse_log_level(&self.other_level)?;

        let mut directives = vec![directive_level(other_level)];
        directives.extend(
            HAL_TARGETS
                .iter()
                .map(|target| format!("{}={}", target, directive_level(level))),
        );
        Ok(directives.join(","))
    }
}

fn directive_level(level: Level) -> String {
    level.as_str().to_ascii_lowercase()
}

/// Install the global subscriber described by `config`
///
/// Fails with [`RouteError::Logging`] on an unknown level or if a global
/// subscriber is already installed.
pub fn setup_logging(config: &LoggingConfig) -> Result<()> {
    let directives = config.filter_directives()?;
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&directives)
            .map_err(|e| RouteError::Logging(format!("Invalid filter {}: {}", directives, e)))?,
    };

    let span_events = if config.log_spans {
        FmtSpan::ACTIVE
    } else {
        FmtSpan::NONE
    };

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_span_events(span_events)
        .with_file(config.file_info)
        .with_line_number(config.file_info);

    let installed = if config.json {
        subscriber.json().try_init()
    } else {
        subscriber.try_init()
    };
    installed.map_err(|e| RouteError::Logging(e.to_string()))?;

    info!(
        "{} v{} logging ready ({})",
        config.process_name,
        crate::VERSION,
        directives
    );
    Ok(())
}

/// Parse a log level from a string
pub fn parse_log_level(level: &str) -> Result<Level> {
    Level::from_str(level.trim())
        .map_err(|_| RouteError::Logging(format!("Invalid log level: {}", level)))
}
