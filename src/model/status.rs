//! # Stream Status
//!
//! Live stream status as reported by the provider. Never cached locally.

use std::fmt;

/// Status of a stream that exists on the provider side
///
/// A stream that does not exist is reported as
/// [`ProviderError::NotFound`](crate::provider::ProviderError::NotFound)
/// rather than as a status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamStatus {
    Creating,
    Deleting,
    Active,
    Updating,
    /// Any status string the broker does not know about
    Unknown(String),
}

impl StreamStatus {
    /// Map the provider's status string
    #[must_use]
    pub fn from_provider(raw: &str) -> Self {
        match raw {
            "CREATING" => StreamStatus::Creating,
            "DELETING" => StreamStatus::Deleting,
            "ACTIVE" => StreamStatus::Active,
            "UPDATING" => StreamStatus::Updating,
            other => StreamStatus::Unknown(other.to_string()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            StreamStatus::Creating => "CREATING",
            StreamStatus::Deleting => "DELETING",
            StreamStatus::Active => "ACTIVE",
            StreamStatus::Updating => "UPDATING",
            StreamStatus::Unknown(raw) => raw,
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self, StreamStatus::Active)
    }
}

impl fmt::Display for StreamStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
