//! # Broker Configuration
//!
//! Broker-level settings loaded from environment variables.

use std::time::Duration;

/// Broker-level configuration
///
/// All settings have sensible defaults and can be overridden via environment variables.
/// The pipeline step passes these through from its task properties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokerConfig {
    /// Tag key for the strategic business unit
    pub sbu_tag_key: String,
    /// Tag key for the organisation
    pub org_tag_key: String,
    /// Tag key for the application name (ownership marker used by sweep)
    pub app_tag_key: String,
    /// Tag key for the cluster id
    pub cluster_tag_key: String,
    /// Delay between status polls while waiting for ACTIVE (seconds)
    pub poll_interval_secs: u64,
    /// Total wait budget for a stream to become ACTIVE (seconds)
    pub wait_timeout_secs: u64,
    /// KMS key id used when starting stream encryption
    pub kms_key_id: String,
    /// Global log level (ERROR, WARN, INFO, DEBUG, TRACE)
    pub log_level: String,
    /// Log format (json, text)
    pub log_format: String,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        use crate::constants::*;
        Self {
            sbu_tag_key: DEFAULT_SBU_TAG_KEY.to_string(),
            org_tag_key: DEFAULT_ORG_TAG_KEY.to_string(),
            app_tag_key: DEFAULT_APP_TAG_KEY.to_string(),
            cluster_tag_key: DEFAULT_CLUSTER_TAG_KEY.to_string(),
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            wait_timeout_secs: DEFAULT_WAIT_TIMEOUT_SECS,
            kms_key_id: DEFAULT_KMS_KEY_ID.to_string(),
            log_level: "INFO".to_string(),
            log_format: "text".to_string(),
        }
    }
}

impl BrokerConfig {
    /// Load configuration from environment variables with defaults
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    ///
    /// `from_env` delegates here; tests pass a map instead of mutating the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        use crate::constants::*;
        Self {
            sbu_tag_key: var_or_default_str(&lookup, "SBU_TAG_KEY", DEFAULT_SBU_TAG_KEY),
            org_tag_key: var_or_default_str(&lookup, "ORG_TAG_KEY", DEFAULT_ORG_TAG_KEY),
            app_tag_key: var_or_default_str(&lookup, "APP_TAG_KEY", DEFAULT_APP_TAG_KEY),
            cluster_tag_key: var_or_default_str(
                &lookup,
                "CLUSTER_TAG_KEY",
                DEFAULT_CLUSTER_TAG_KEY,
            ),
            poll_interval_secs: positive_or_default(
                &lookup,
                "STREAM_POLL_INTERVAL_SECS",
                DEFAULT_POLL_INTERVAL_SECS,
            ),
            wait_timeout_secs: positive_or_default(
                &lookup,
                "STREAM_WAIT_TIMEOUT_SECS",
                DEFAULT_WAIT_TIMEOUT_SECS,
            ),
            kms_key_id: var_or_default_str(&lookup, "STREAM_KMS_KEY_ID", DEFAULT_KMS_KEY_ID),
            log_level: var_or_default_str(&lookup, "LOG_LEVEL", "INFO"),
            log_format: var_or_default_str(&lookup, "LOG_FORMAT", "text"),
        }
    }

    /// Get poll interval duration
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Get wait timeout duration
    #[must_use]
    pub fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout_secs)
    }
}

/// Read a variable or return default value
fn var_or_default<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Read a non-zero number of seconds or return default
fn positive_or_default<F>(lookup: &F, key: &str, default: u64) -> u64
where
    F: Fn(&str) -> Option<String>,
{
    match var_or_default(lookup, key, default) {
        0 => default,
        secs => secs,
    }
}

/// Read a variable as string or return default; blank values count as unset
fn var_or_default_str<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}
