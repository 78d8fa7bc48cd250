//! Structured logging setup.
//!
//! Thin layer over the `tracing` stack: level and per-module filtering via
//! `EnvFilter`, text or JSON output. Environment variables (`ATELIER_LOG`,
//! `ATELIER_LOG_FORMAT`) take precedence over the configuration file.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing_subscriber::fmt;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};

use crate::error::HostError;

/// Logging configuration, normally the `[logging]` table of the settings
/// file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error, off
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: json, text (default: text)
    #[serde(default = "default_format")]
    pub format: String,

    /// Enable colored output (text format only)
    #[serde(default = "default_true")]
    pub color: bool,

    /// Module-specific log levels
    #[serde(default)]
    pub modules: HashMap<String, String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_format(),
            color: default_true(),
            modules: HashMap::new(),
        }
    }
}

/// Initialize the logging system for the hosting process.
///
/// Fails with a configuration error if a directive is malformed or a
/// subscriber is already installed.
pub fn init(config: &LoggingConfig) -> Result<(), HostError> {
    let filter = build_env_filter(config)?;
    let format = determine_format(config)?;

    let base = Registry::default().with(filter);

    if format == "json" {
        base.with(
            fmt::layer()
                .json()
                .with_target(true)
                .with_timer(ChronoUtc::rfc_3339())
                .with_writer(std::io::stderr),
        )
        .try_init()
        .map_err(|e| HostError::Config(format!("failed to initialize logging: {}", e)))?;
    } else {
        base.with(
            fmt::layer()
                .with_target(true)
                .with_timer(ChronoUtc::rfc_3339())
                .with_ansi(config.color)
                .with_writer(std::io::stderr),
        )
        .try_init()
        .map_err(|e| HostError::Config(format!("failed to initialize logging: {}", e)))?;
    }

    Ok(())
}

fn build_env_filter(config: &LoggingConfig) -> Result<EnvFilter, HostError> {
    // ATELIER_LOG overrides everything when set.
    if let Ok(filter) = EnvFilter::try_from_env("ATELIER_LOG") {
        return Ok(filter);
    }

    if config.level == "off" {
        return Ok(EnvFilter::new("off"));
    }

    let mut filter = EnvFilter::new(&config.level);
    for (module, level) in &config.modules {
        let directive = format!("{}={}", module, level);
        filter = filter.add_directive(
            directive
                .parse()
                .map_err(|e| HostError::Config(format!("invalid log directive: {}", e)))?,
        );
    }

    Ok(filter)
}

fn determine_format(config: &LoggingConfig) -> Result<String, HostError> {
    if let Ok(format) = std::env::var("ATELIER_LOG_FORMAT") {
        if format == "json" || format == "text" {
            return Ok(format);
        }
    }

    if config.format != "json" && config.format != "text" {
        return Err(HostError::Config(format!(
            "invalid log format: {} (expected \"json\" or \"text\")",
            config.format
        )));
    }
    Ok(config.format.clone())
}
