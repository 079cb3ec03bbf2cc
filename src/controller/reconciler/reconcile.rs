//! # Reconciliation Logic
//!
//! Create-or-adopt for a single declared stream.
//!
//! 1. Describe the stream
//! 2. Exists: wait for ACTIVE if needed, never re-tag or re-encrypt
//! 3. Not found: create, wait for ACTIVE, tag, start encryption
//!
//! Failures never escape `reconcile`; they are written to the build log and
//! returned as a [`ReconcileOutcome`].

use super::types::{BrokerError, ConfigureStage, FailureStage, ReconcileOutcome, StreamBroker};
use super::validation::validate_stream_spec;
use crate::controller::wait::wait_until;
use crate::model::{StreamSpec, StreamStatus};
use crate::provider::ProviderError;
use std::time::Instant;
use tracing::{debug, info, info_span, warn, Instrument};

impl StreamBroker {
    /// Reconcile one declared stream
    pub async fn reconcile(&self, spec: &StreamSpec) -> ReconcileOutcome {
        let span = info_span!(
            "reconcile",
            stream.name = %spec.name,
            stream.shards = spec.shard_count
        );

        async move {
            let start = Instant::now();
            let outcome = self.reconcile_internal(spec).await;

            if let Some(error) = outcome.error() {
                warn!(
                    outcome = outcome.as_str(),
                    error = %error,
                    duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
                    "Stream reconciliation did not complete"
                );
            } else {
                info!(
                    outcome = outcome.as_str(),
                    duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
                    "Stream reconciled"
                );
            }
            outcome
        }
        .instrument(span)
        .await
    }

    /// Reconcile every declared stream, one after another
    ///
    /// Stops after the first stream handled once the cancellation token has
    /// fired; later specs get no outcome.
    pub async fn reconcile_all(&self, specs: &[StreamSpec]) -> Vec<(StreamSpec, ReconcileOutcome)> {
        let mut outcomes = Vec::with_capacity(specs.len());
        for spec in specs {
            let outcome = self.reconcile(spec).await;
            outcomes.push((spec.clone(), outcome));

            if self.is_cancelled() {
                warn!(
                    reconciled = outcomes.len(),
                    skipped = specs.len() - outcomes.len(),
                    "Reconciliation interrupted"
                );
                break;
            }
        }
        outcomes
    }

    async fn reconcile_internal(&self, spec: &StreamSpec) -> ReconcileOutcome {
        if let Err(error) = validate_stream_spec(spec) {
            self.log.error(&format!("Stream {} was not reconciled: {error}", spec.name));
            return ReconcileOutcome::Failed {
                stage: FailureStage::Validation,
                error,
            };
        }

        match self.provider.describe_stream_status(&spec.name).await {
            Ok(status) => self.adopt_existing(spec, &status).await,
            Err(e) if e.is_not_found() => {
                debug!(stream = %spec.name, "Stream not found");
                self.create_and_configure(spec).await
            }
            Err(e) => {
                self.log.error(&format!(
                    "Stream {} never became active while trying to check if it already exists.",
                    spec.name
                ));
                ReconcileOutcome::Failed {
                    stage: FailureStage::Describe,
                    error: e.into(),
                }
            }
        }
    }

    async fn adopt_existing(&self, spec: &StreamSpec, status: &StreamStatus) -> ReconcileOutcome {
        self.log.info(&format!("Stream {} has a status of {status}.", spec.name));

        if *status == StreamStatus::Deleting {
            self.log.info(&format!("Stream {} is being deleted.", spec.name));
        }

        if status.is_active() {
            return ReconcileOutcome::Existing { waited: false };
        }

        self.await_existing(spec).await
    }

    async fn await_existing(&self, spec: &StreamSpec) -> ReconcileOutcome {
        match self.wait_for_active(&spec.name).await {
            Ok(()) => ReconcileOutcome::Existing { waited: true },
            Err(error) => {
                self.log.error(&format!(
                    "Stream {} never became active while trying to check if it already exists.",
                    spec.name
                ));
                ReconcileOutcome::Failed {
                    stage: FailureStage::AwaitExisting,
                    error,
                }
            }
        }
    }

    async fn create_and_configure(&self, spec: &StreamSpec) -> ReconcileOutcome {
        // A stream created now could never be tagged, and sweep would not see it
        if self.is_cancelled() {
            let error = BrokerError::Cancelled {
                stream: spec.name.clone(),
            };
            self.log.error(&format!("Stream {} was not reconciled: {error}", spec.name));
            return ReconcileOutcome::Failed {
                stage: FailureStage::Create,
                error,
            };
        }

        self.log.info(&format!("Stream {} does not exist. Creating it now.", spec.name));

        match self.provider.create_stream(&spec.name, spec.shard_count).await {
            Ok(()) => {}
            Err(e) if e.is_already_exists() => {
                // Another deployment created it between describe and create
                self.log.info(&format!(
                    "Stream {} was created concurrently; adopting it.",
                    spec.name
                ));
                return self.await_existing(spec).await;
            }
            Err(e) => {
                self.log.error(&format!("Failed to create Stream {}: {e}", spec.name));
                return ReconcileOutcome::Failed {
                    stage: FailureStage::Create,
                    error: e.into(),
                };
            }
        }

        match self.configure_created(&spec.name).await {
            Ok(()) => {
                self.log.info(&format!("Stream {} is ACTIVE, tagged and encrypted.", spec.name));
                ReconcileOutcome::Provisioned
            }
            Err((stage, error)) => {
                self.log.error(&format!(
                    "Stream {} never became active, failed to add tags or failed to start encryption: {error}",
                    spec.name
                ));
                ReconcileOutcome::CreatedUnconfigured { stage, error }
            }
        }
    }

    async fn configure_created(
        &self,
        stream_name: &str,
    ) -> Result<(), (ConfigureStage, BrokerError)> {
        self.wait_for_active(stream_name)
            .await
            .map_err(|e| (ConfigureStage::AwaitActive, e))?;

        self.provider
            .add_tags_to_stream(stream_name, &self.tags.to_map())
            .await
            .map_err(|e| (ConfigureStage::Tagging, e.into()))?;

        self.provider
            .start_stream_encryption(stream_name, &self.kms_key_id)
            .await
            .map_err(|e| (ConfigureStage::Encryption, e.into()))?;

        Ok(())
    }

    /// Block until the stream reports ACTIVE
    ///
    /// Not-found answers count as "not yet active"; any other provider error
    /// ends the wait.
    pub async fn wait_for_active(&self, stream_name: &str) -> Result<(), BrokerError> {
        self.log.info(&format!("Waiting for Stream {stream_name} to become ACTIVE..."));

        let provider = &self.provider;
        let log = &self.log;

        wait_until(
            self.wait,
            self.cancel.as_ref(),
            stream_name,
            || async move {
                let status = provider.describe_stream_status(stream_name).await;
                if let Ok(current) = &status {
                    log.info(&format!("Current state: {current}"));
                }
                status
            },
            StreamStatus::is_active,
            ProviderError::is_not_found,
        )
        .await
        .map(|_| ())
        .map_err(BrokerError::from)
    }
}
