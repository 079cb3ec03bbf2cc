//! # Prelude
//!
//! Re-exports commonly used types and traits for convenience.
//!
//! ## Usage
//!
//! ```rust
//! use kinesis_broker::prelude::*;
//! ```

// Model types
pub use crate::model::{OwnershipTag, OwnershipTags, StreamSpec, StreamStatus};

// Provider seam
pub use crate::provider::{ProviderError, StreamProvider};

// Broker types - core functionality
pub use crate::controller::reconciler::{
    BrokerError, ConfigureStage, FailureStage, ReconcileOutcome, StreamBroker, SweepMode,
    SweepReport,
};
pub use crate::controller::wait::{WaitConfig, WaitError};

// Config types
pub use crate::config::{BrokerConfig, ClusterMetadata, DeploymentDefinition};

// Build log sinks
pub use crate::observability::{BufferedBuildLog, BuildLog, TracingBuildLog};

pub use crate::provider::aws::AwsKinesis;
