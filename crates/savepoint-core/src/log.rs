//! Logging setup using tracing.
//!
//! Hosts embedding the save coordinator call [`init`] once at startup.
//! The `RUST_LOG` environment variable overrides the configured level.

use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Log level configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Filter directive understood by `EnvFilter`.
    pub fn directive(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Emit formatted logs to stderr.
    pub stderr: bool,

    /// Log level when `RUST_LOG` is unset.
    pub level: LogLevel,

    /// Annotate each line with its source file and line number.
    pub with_location: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            stderr: false,
            level: LogLevel::Info,
            with_location: false,
        }
    }
}

/// Initialize logging with the given configuration.
///
/// Later calls are no-ops; the first subscriber stays installed.
pub fn init(config: LogConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.directive()));

    let registry = tracing_subscriber::registry().with(filter);

    if config.stderr {
        let layer = fmt::layer()
            .with_file(config.with_location)
            .with_line_number(config.with_location);

        let _ = registry.with(layer).try_init();
    } else {
        // No output layer; spans and filtering still work
        let _ = registry.try_init();
    }
}
