//! # Provider Errors
//!
//! Typed errors for provider calls, classified from the AWS error code
//! instead of string matching on the Debug output.

use thiserror::Error;

/// Provider error categories
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// Stream does not exist (drives the create path)
    #[error("Stream not found: {stream}")]
    NotFound { stream: String },

    /// Stream already exists (lost a create race)
    #[error("Stream already exists: {stream}")]
    AlreadyExists { stream: String },

    /// Rate limit exceeded
    #[error("Rate limit exceeded: {message}")]
    Throttled { message: String },

    /// Any other service or transport failure
    #[error("Provider error{}: {message}", code_suffix(.code.as_deref()))]
    Service {
        code: Option<String>,
        message: String,
    },
}

impl ProviderError {
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, ProviderError::NotFound { .. })
    }

    #[must_use]
    pub fn is_already_exists(&self) -> bool {
        matches!(self, ProviderError::AlreadyExists { .. })
    }

    /// Convenience constructor for generic failures
    pub fn service(message: impl Into<String>) -> Self {
        ProviderError::Service {
            code: None,
            message: message.into(),
        }
    }
}

fn code_suffix(code: Option<&str>) -> String {
    code.map(|c| format!(" ({c})")).unwrap_or_default()
}

/// Known error codes for "not found" conditions
const NOT_FOUND_CODES: &[&str] = &["ResourceNotFoundException"];

/// Known error codes for "already exists" conditions
const ALREADY_EXISTS_CODES: &[&str] = &["ResourceInUseException"];

/// Known error codes for throttling
const THROTTLING_CODES: &[&str] = &[
    "LimitExceededException",
    "Throttling",
    "ThrottlingException",
];

/// Classify a provider error from its code and message.
///
/// `ResourceInUseException` is only an "already exists" signal for create
/// calls; other operations report it as a generic service error.
#[must_use]
pub fn classify_provider_error(
    stream: &str,
    operation: &str,
    code: Option<&str>,
    message: Option<&str>,
) -> ProviderError {
    let message = message.unwrap_or("Unknown error").to_string();

    match code {
        Some(c) if NOT_FOUND_CODES.contains(&c) => ProviderError::NotFound {
            stream: stream.to_string(),
        },
        Some(c) if ALREADY_EXISTS_CODES.contains(&c) && operation == "CreateStream" => {
            ProviderError::AlreadyExists {
                stream: stream.to_string(),
            }
        }
        Some(c) if THROTTLING_CODES.contains(&c) => ProviderError::Throttled { message },
        _ => ProviderError::Service {
            code: code.map(ToString::to_string),
            message,
        },
    }
}
