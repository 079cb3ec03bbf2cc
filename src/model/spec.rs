//! # Stream Spec
//!
//! Desired state of one Kinesis stream as declared by the deployment definition.

use serde::{Deserialize, Serialize};

/// Desired stream: name plus shard count
///
/// Supplied by the caller and never mutated during reconciliation.
///
/// # Example
///
/// ```yaml
/// name: orders-stream
/// shardCount: 2
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamSpec {
    /// Stream name, unique per account and region
    pub name: String,
    /// Number of shards to create the stream with
    #[serde(default = "default_shard_count")]
    pub shard_count: i32,
}

impl StreamSpec {
    #[must_use]
    pub fn new(name: impl Into<String>, shard_count: i32) -> Self {
        Self {
            name: name.into(),
            shard_count,
        }
    }
}

fn default_shard_count() -> i32 {
    1
}
