//! # Types
//!
//! Core types for the stream broker.

use crate::config::BrokerConfig;
use crate::controller::wait::{WaitConfig, WaitError};
use crate::model::OwnershipTags;
use crate::observability::BuildLog;
use crate::provider::{ProviderError, StreamProvider};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BrokerError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("Stream {stream} never became active after {timeout:?} ({attempts} polls)")]
    NeverActive {
        stream: String,
        timeout: Duration,
        attempts: u32,
    },

    #[error("Wait for stream {stream} cancelled")]
    Cancelled { stream: String },

    #[error("Invalid stream spec {stream:?}: {reason}")]
    InvalidSpec { stream: String, reason: String },
}

impl From<WaitError<ProviderError>> for BrokerError {
    fn from(err: WaitError<ProviderError>) -> Self {
        match err {
            WaitError::Timeout {
                resource,
                timeout,
                attempts,
            } => BrokerError::NeverActive {
                stream: resource,
                timeout,
                attempts,
            },
            WaitError::Cancelled { resource } => BrokerError::Cancelled { stream: resource },
            WaitError::Check { error, .. } => BrokerError::Provider(error),
        }
    }
}

/// Step that failed after the stream was created
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigureStage {
    AwaitActive,
    Tagging,
    Encryption,
}

/// Step that failed before anything was created
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureStage {
    Validation,
    Describe,
    AwaitExisting,
    Create,
}

/// Result of reconciling one stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Stream already existed and is ACTIVE; it was left untouched.
    /// `waited` is true when the broker had to wait for it to become ACTIVE.
    Existing { waited: bool },
    /// Stream was created, became ACTIVE, was tagged and encrypted
    Provisioned,
    /// Stream was created but a later step failed; it is left as is
    CreatedUnconfigured {
        stage: ConfigureStage,
        error: BrokerError,
    },
    /// Nothing was created
    Failed {
        stage: FailureStage,
        error: BrokerError,
    },
}

impl ReconcileOutcome {
    /// Stream is ACTIVE and fully handled
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            ReconcileOutcome::Existing { .. } | ReconcileOutcome::Provisioned
        )
    }

    /// This reconciliation issued a create request that succeeded
    #[must_use]
    pub fn created(&self) -> bool {
        matches!(
            self,
            ReconcileOutcome::Provisioned | ReconcileOutcome::CreatedUnconfigured { .. }
        )
    }

    #[must_use]
    pub fn error(&self) -> Option<&BrokerError> {
        match self {
            ReconcileOutcome::CreatedUnconfigured { error, .. }
            | ReconcileOutcome::Failed { error, .. } => Some(error),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ReconcileOutcome::Existing { waited: false } => "existing",
            ReconcileOutcome::Existing { waited: true } => "existing-after-wait",
            ReconcileOutcome::Provisioned => "provisioned",
            ReconcileOutcome::CreatedUnconfigured { .. } => "created-unconfigured",
            ReconcileOutcome::Failed { .. } => "failed",
        }
    }
}

/// Whether sweep deletes or only reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SweepMode {
    #[default]
    Delete,
    DryRun,
}

/// What a sweep found and did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub mode: SweepMode,
    /// Owned streams deleted
    pub deleted: Vec<String>,
    /// Owned streams a dry run would have deleted
    pub would_delete: Vec<String>,
    /// Owned streams still declared
    pub retained: Vec<String>,
    /// Streams without the ownership tag
    pub not_owned: Vec<String>,
    /// Owned streams whose delete request failed
    pub failed: Vec<(String, BrokerError)>,
    /// Streams whose tags could not be read
    pub skipped: Vec<(String, BrokerError)>,
}

impl SweepReport {
    #[must_use]
    pub fn total_seen(&self) -> usize {
        self.deleted.len()
            + self.would_delete.len()
            + self.retained.len()
            + self.not_owned.len()
            + self.failed.len()
            + self.skipped.len()
    }
}

/// Reconciles declared streams against the provider
///
/// Holds no mutable state: every call re-reads the provider, so calls for
/// different streams may run concurrently.
pub struct StreamBroker {
    pub(crate) provider: Arc<dyn StreamProvider>,
    pub(crate) log: Arc<dyn BuildLog>,
    pub(crate) tags: OwnershipTags,
    pub(crate) wait: WaitConfig,
    pub(crate) kms_key_id: String,
    pub(crate) cancel: Option<CancellationToken>,
}

impl std::fmt::Debug for StreamBroker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamBroker")
            .field("tags", &self.tags)
            .field("wait", &self.wait)
            .field("kms_key_id", &self.kms_key_id)
            .finish_non_exhaustive()
    }
}

impl StreamBroker {
    #[must_use]
    pub fn new(
        provider: Arc<dyn StreamProvider>,
        log: Arc<dyn BuildLog>,
        tags: OwnershipTags,
        config: &BrokerConfig,
    ) -> Self {
        Self {
            provider,
            log,
            tags,
            wait: WaitConfig::from(config),
            kms_key_id: config.kms_key_id.clone(),
            cancel: None,
        }
    }

    /// Abort waits when the token is cancelled
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    #[must_use]
    pub fn with_wait_config(mut self, wait: WaitConfig) -> Self {
        self.wait = wait;
        self
    }

    /// The cancellation token has fired
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancellationToken::is_cancelled)
    }

    #[must_use]
    pub fn ownership_tags(&self) -> &OwnershipTags {
        &self.tags
    }
}
