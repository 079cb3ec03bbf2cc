//! # Constants
//!
//! Shared constants used throughout the broker.
//!
//! These values represent the defaults of the deployment pipeline and can be
//! overridden via environment variables where applicable (see [`crate::config`]).

/// Interval between stream status polls while waiting for ACTIVE (seconds)
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 20;

/// Total time to wait for a stream to become ACTIVE (seconds)
pub const DEFAULT_WAIT_TIMEOUT_SECS: u64 = 600;

/// KMS key used for server-side stream encryption (AWS managed key)
pub const DEFAULT_KMS_KEY_ID: &str = "alias/aws/kinesis";

/// Tag key carrying the strategic business unit
pub const DEFAULT_SBU_TAG_KEY: &str = "sbu";

/// Tag key carrying the organisation
pub const DEFAULT_ORG_TAG_KEY: &str = "org";

/// Tag key carrying the application name; this pair marks stream ownership
pub const DEFAULT_APP_TAG_KEY: &str = "appName";

/// Tag key carrying the ECS cluster id
pub const DEFAULT_CLUSTER_TAG_KEY: &str = "clusterId";

/// Maximum shards returned per describe call while polling
pub const DESCRIBE_SHARD_LIMIT: i32 = 10;

/// Kinesis stream names are 1-128 characters
pub const MAX_STREAM_NAME_LEN: usize = 128;
