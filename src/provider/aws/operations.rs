//! # AWS Kinesis Operations
//!
//! Implements `StreamProvider` for Kinesis Data Streams.

use super::{provider_error, AwsKinesis};
use crate::constants::DESCRIBE_SHARD_LIMIT;
use crate::model::StreamStatus;
use crate::provider::{ProviderError, StreamProvider};
use async_trait::async_trait;
use aws_sdk_kinesis::types::EncryptionType;
use std::collections::HashMap;
use tracing::{debug, debug_span, info, Instrument};

#[async_trait]
impl StreamProvider for AwsKinesis {
    async fn describe_stream_status(
        &self,
        stream_name: &str,
    ) -> Result<StreamStatus, ProviderError> {
        let span = debug_span!(
            "kinesis.stream.describe",
            stream.name = stream_name,
            region = %self.region
        );

        async move {
            let output = self
                .client
                .describe_stream()
                .stream_name(stream_name)
                .limit(DESCRIBE_SHARD_LIMIT)
                .send()
                .await
                .map_err(|e| provider_error(stream_name, "DescribeStream", &e))?;

            let description = output.stream_description().ok_or_else(|| {
                ProviderError::service(format!(
                    "DescribeStream returned no description for {stream_name}"
                ))
            })?;

            let status = StreamStatus::from_provider(description.stream_status().as_str());
            debug!(stream = stream_name, status = %status, "Described stream");
            Ok(status)
        }
        .instrument(span)
        .await
    }

    async fn create_stream(
        &self,
        stream_name: &str,
        shard_count: i32,
    ) -> Result<(), ProviderError> {
        info!(
            provider = "aws",
            region = %self.region,
            stream = stream_name,
            shard_count,
            operation = "create",
            "Creating Kinesis stream"
        );
        self.client
            .create_stream()
            .stream_name(stream_name)
            .shard_count(shard_count)
            .send()
            .await
            .map_err(|e| provider_error(stream_name, "CreateStream", &e))?;
        Ok(())
    }

    async fn delete_stream(&self, stream_name: &str) -> Result<(), ProviderError> {
        info!(
            provider = "aws",
            region = %self.region,
            stream = stream_name,
            operation = "delete",
            "Deleting Kinesis stream"
        );
        self.client
            .delete_stream()
            .stream_name(stream_name)
            .send()
            .await
            .map_err(|e| provider_error(stream_name, "DeleteStream", &e))?;
        Ok(())
    }

    async fn list_streams(&self) -> Result<Vec<String>, ProviderError> {
        let mut names = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let output = self
                .client
                .list_streams()
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(|e| provider_error("*", "ListStreams", &e))?;

            names.extend(output.stream_names().iter().cloned());

            match output.next_token() {
                Some(token) if !token.is_empty() => next_token = Some(token.to_string()),
                _ => break,
            }
        }

        debug!(count = names.len(), region = %self.region, "Listed Kinesis streams");
        Ok(names)
    }

    async fn list_tags_for_stream(
        &self,
        stream_name: &str,
    ) -> Result<HashMap<String, String>, ProviderError> {
        let mut tags = HashMap::new();
        let mut exclusive_start_tag_key: Option<String> = None;

        loop {
            let output = self
                .client
                .list_tags_for_stream()
                .stream_name(stream_name)
                .set_exclusive_start_tag_key(exclusive_start_tag_key.take())
                .send()
                .await
                .map_err(|e| provider_error(stream_name, "ListTagsForStream", &e))?;

            let mut last_key = None;
            for tag in output.tags() {
                let key = tag.key().to_string();
                tags.insert(key.clone(), tag.value().unwrap_or_default().to_string());
                last_key = Some(key);
            }

            match last_key {
                Some(key) if output.has_more_tags() => exclusive_start_tag_key = Some(key),
                _ => break,
            }
        }

        Ok(tags)
    }

    async fn add_tags_to_stream(
        &self,
        stream_name: &str,
        tags: &HashMap<String, String>,
    ) -> Result<(), ProviderError> {
        debug!(stream = stream_name, tag_count = tags.len(), "Tagging Kinesis stream");
        self.client
            .add_tags_to_stream()
            .stream_name(stream_name)
            .set_tags(Some(tags.clone()))
            .send()
            .await
            .map_err(|e| provider_error(stream_name, "AddTagsToStream", &e))?;
        Ok(())
    }

    async fn start_stream_encryption(
        &self,
        stream_name: &str,
        kms_key_id: &str,
    ) -> Result<(), ProviderError> {
        debug!(stream = stream_name, key_id = kms_key_id, "Starting stream encryption");
        self.client
            .start_stream_encryption()
            .stream_name(stream_name)
            .encryption_type(EncryptionType::Kms)
            .key_id(kms_key_id)
            .send()
            .await
            .map_err(|e| provider_error(stream_name, "StartStreamEncryption", &e))?;
        Ok(())
    }
}
