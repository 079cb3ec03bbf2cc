//! # Logging
//!
//! Tracing subscriber setup for the broker binary.
//!
//! `RUST_LOG` takes precedence; otherwise the level comes from `LOG_LEVEL`
//! (see [`BrokerConfig`](crate::config::BrokerConfig)). `LOG_FORMAT=json`
//! switches to one JSON object per line for log shippers.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    /// Parse a format name; anything other than `json` is text
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Text
        }
    }
}

/// Build the env filter directive for a configured level
///
/// Build-log lines are always kept at `info`.
#[must_use]
pub fn default_directive(log_level: &str) -> String {
    let level = match log_level.trim().to_ascii_lowercase().as_str() {
        "error" => "error",
        "warn" | "warning" => "warn",
        "debug" => "debug",
        "trace" => "trace",
        _ => "info",
    };
    format!("kinesis_broker={level},build_log=info")
}

/// Install the global tracing subscriber
pub fn init(log_level: &str, format: LogFormat) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(log_level)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.try_init(),
    }
    .map_err(|e| anyhow!("Failed to initialise tracing subscriber: {e}"))
}
