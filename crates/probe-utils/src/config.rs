//! Logging configuration

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Environment variable selecting the log output format
pub const LOG_FORMAT_ENV: &str = "STOCK_PROBE_LOG_FORMAT";

/// Output format for log lines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable, one line per event
    #[default]
    Pretty,
    /// Newline-delimited JSON
    Json,
}

/// Returned when a log format name is not recognised
#[derive(Debug, Error)]
#[error("unknown log format '{0}', expected 'pretty' or 'json'")]
pub struct UnknownLogFormat(String);

impl FromStr for LogFormat {
    type Err = UnknownLogFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(UnknownLogFormat(other.to_string())),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Filter directive used when `RUST_LOG` is not set
    pub default_directive: String,
    /// Output format
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            default_directive: "warn,probe_stock=info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl LogConfig {
    /// Read the log format from `STOCK_PROBE_LOG_FORMAT`, keeping the
    /// current format when the variable is unset or invalid
    pub fn with_env_format(mut self) -> Self {
        if let Ok(value) = std::env::var(LOG_FORMAT_ENV) {
            if let Ok(format) = value.parse() {
                self.format = format;
            }
        }
        self
    }
}
