//! # Provider Modules
//!
//! Control-plane seam for stream providers.
//!
//! The broker only talks to [`StreamProvider`]; `aws` implements it on top of
//! the AWS SDK. Tests drive the broker with scripted in-memory providers.

use crate::model::StreamStatus;
use async_trait::async_trait;
use std::collections::HashMap;

pub mod error;

pub use error::{classify_provider_error, ProviderError};

/// Provider trait for stream control planes
///
/// Every call is a single request/response against the provider; no
/// implementation retries internally.
#[async_trait]
pub trait StreamProvider: Send + Sync {
    /// Current status of a stream, or [`ProviderError::NotFound`]
    async fn describe_stream_status(
        &self,
        stream_name: &str,
    ) -> Result<StreamStatus, ProviderError>;

    /// Request creation of a stream with the given shard count
    async fn create_stream(
        &self,
        stream_name: &str,
        shard_count: i32,
    ) -> Result<(), ProviderError>;

    /// Request deletion of a stream
    async fn delete_stream(&self, stream_name: &str) -> Result<(), ProviderError>;

    /// Names of all streams visible to the caller's credentials
    async fn list_streams(&self) -> Result<Vec<String>, ProviderError>;

    /// All tags on a stream, keyed by tag key
    async fn list_tags_for_stream(
        &self,
        stream_name: &str,
    ) -> Result<HashMap<String, String>, ProviderError>;

    /// Add (or overwrite) tags on a stream
    async fn add_tags_to_stream(
        &self,
        stream_name: &str,
        tags: &HashMap<String, String>,
    ) -> Result<(), ProviderError>;

    /// Start server-side KMS encryption with the given key
    async fn start_stream_encryption(
        &self,
        stream_name: &str,
        kms_key_id: &str,
    ) -> Result<(), ProviderError>;
}

// Provider implementations
pub mod aws;
