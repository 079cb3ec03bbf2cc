//! # Validation
//!
//! Checks a stream spec against Kinesis naming and sizing rules before any
//! provider call is made.

use super::types::BrokerError;
use crate::constants::MAX_STREAM_NAME_LEN;
use crate::model::StreamSpec;

/// Validate a stream spec
///
/// Names are 1-128 characters of `[a-zA-Z0-9_.-]`; shard count is at least 1.
pub fn validate_stream_spec(spec: &StreamSpec) -> Result<(), BrokerError> {
    let invalid = |reason: String| BrokerError::InvalidSpec {
        stream: spec.name.clone(),
        reason,
    };

    if spec.name.is_empty() {
        return Err(invalid("name must not be empty".to_string()));
    }

    if spec.name.len() > MAX_STREAM_NAME_LEN {
        return Err(invalid(format!(
            "name must be at most {MAX_STREAM_NAME_LEN} characters, got {}",
            spec.name.len()
        )));
    }

    if let Some(bad) = spec
        .name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(*c, '_' | '.' | '-')))
    {
        return Err(invalid(format!("name contains invalid character {bad:?}")));
    }

    if spec.shard_count < 1 {
        return Err(invalid(format!(
            "shard count must be at least 1, got {}",
            spec.shard_count
        )));
    }

    Ok(())
}
