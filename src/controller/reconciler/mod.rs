//! # Reconciler
//!
//! Core reconciliation logic for declared Kinesis streams.
//!
//! The reconciler:
//! - Describes each declared stream and adopts it when it already exists
//! - Creates missing streams, waits for ACTIVE, tags and encrypts them
//! - Sweeps owned streams that are no longer declared
//!
//! The provider is the only source of truth; nothing is cached between calls,
//! so re-running after a partial failure is always safe.

pub mod reconcile;
pub mod sweep;
pub mod types;
pub mod validation;

// Re-export public API
pub use types::{
    BrokerError, ConfigureStage, FailureStage, ReconcileOutcome, StreamBroker, SweepMode,
    SweepReport,
};
pub use validation::validate_stream_spec;
