//! # AWS Kinesis Client
//!
//! Client for interacting with the Kinesis Data Streams control plane.
//!
//! This module provides functionality to:
//! - Describe, create and delete streams
//! - List streams and their tags
//! - Tag streams and start server-side encryption

use crate::provider::{classify_provider_error, ProviderError};
use anyhow::Result;
use aws_sdk_kinesis::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_kinesis::Client as KinesisClient;

pub mod auth;
mod operations;

pub use auth::AwsConfig;

/// AWS Kinesis provider implementation
pub struct AwsKinesis {
    client: KinesisClient,
    region: String,
}

impl std::fmt::Debug for AwsKinesis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsKinesis")
            .field("region", &self.region)
            .finish_non_exhaustive()
    }
}

impl AwsKinesis {
    /// Create a new Kinesis client from the default credential chain
    ///
    /// Fails when no region could be resolved from the settings, the
    /// environment or the shared config files.
    pub async fn new(config: &AwsConfig) -> Result<Self> {
        let sdk_config = auth::load_sdk_config(config).await;
        let region = auth::configured_region(&sdk_config)?;

        Ok(Self {
            client: KinesisClient::new(&sdk_config),
            region,
        })
    }

    /// Wrap an already configured SDK client
    #[must_use]
    pub fn from_client(client: KinesisClient, region: impl Into<String>) -> Self {
        Self {
            client,
            region: region.into(),
        }
    }

    #[must_use]
    pub fn region(&self) -> &str {
        &self.region
    }
}

/// Convert an SDK error into a classified [`ProviderError`]
fn provider_error<E>(stream: &str, operation: &str, err: &SdkError<E>) -> ProviderError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
{
    let message = err
        .message()
        .map_or_else(|| DisplayErrorContext(err).to_string(), ToString::to_string);
    classify_provider_error(stream, operation, err.code(), Some(&message))
}
