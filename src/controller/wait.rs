//! # Wait
//!
//! Timeout-bounded polling with cancellation support.
//!
//! The routine sleeps one interval before every check, so consecutive checks
//! are never closer than `interval`. A check that reports ready ends the wait
//! immediately. Errors accepted by the retryable predicate count as "not ready
//! yet"; any other error ends the wait.
//!
//! All timing goes through `tokio::time`, so tests can run on a paused clock.
//! A timeout too large to add to the current instant leaves the wait unbounded.

use crate::config::BrokerConfig;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Polling cadence and overall budget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitConfig {
    /// Delay before each check
    pub interval: Duration,
    /// Maximum total time, measured from entry into the wait
    pub timeout: Duration,
}

impl Default for WaitConfig {
    fn default() -> Self {
        use crate::constants::{DEFAULT_POLL_INTERVAL_SECS, DEFAULT_WAIT_TIMEOUT_SECS};
        Self {
            interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            timeout: Duration::from_secs(DEFAULT_WAIT_TIMEOUT_SECS),
        }
    }
}

impl From<&BrokerConfig> for WaitConfig {
    fn from(config: &BrokerConfig) -> Self {
        Self {
            interval: config.poll_interval(),
            timeout: config.wait_timeout(),
        }
    }
}

/// Why a wait ended without the resource becoming ready
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WaitError<E> {
    #[error("Timeout waiting for {resource} after {timeout:?} ({attempts} attempts)")]
    Timeout {
        resource: String,
        timeout: Duration,
        attempts: u32,
    },

    #[error("Wait for {resource} cancelled")]
    Cancelled { resource: String },

    #[error("Check for {resource} failed: {error}")]
    Check { resource: String, error: E },
}

/// Poll `check` until `is_ready` accepts its value.
///
/// # Arguments
/// * `config` - Interval and timeout
/// * `cancel` - Optional cancellation token
/// * `resource` - Name for logging and errors
/// * `check` - Async read of the current state
/// * `is_ready` - Success predicate over the value `check` returned
/// * `is_retryable` - Errors for which polling continues
///
/// # Returns
/// * `Ok(value)` - The first value accepted by `is_ready`
/// * `Err` - Timeout, cancelled, or a non-retryable check error
pub async fn wait_until<T, E, F, Fut, R, P>(
    config: WaitConfig,
    cancel: Option<&CancellationToken>,
    resource: &str,
    mut check: F,
    is_ready: R,
    is_retryable: P,
) -> Result<T, WaitError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    R: Fn(&T) -> bool,
    P: Fn(&E) -> bool,
    E: Display,
{
    let deadline = Instant::now().checked_add(config.timeout);
    let mut attempts = 0u32;

    while deadline.is_none_or(|deadline| Instant::now() < deadline) {
        if cancel.is_some_and(CancellationToken::is_cancelled) {
            return Err(WaitError::Cancelled {
                resource: resource.to_string(),
            });
        }

        tokio::select! {
            () = tokio::time::sleep(config.interval) => {}
            () = cancelled(cancel) => {
                return Err(WaitError::Cancelled {
                    resource: resource.to_string(),
                });
            }
        }

        attempts += 1;
        match check().await {
            Ok(value) if is_ready(&value) => {
                debug!(resource = %resource, attempts, "Resource ready");
                return Ok(value);
            }
            Ok(_) => {
                debug!(resource = %resource, attempt = attempts, "Resource not ready, retrying");
            }
            Err(e) if is_retryable(&e) => {
                debug!(
                    resource = %resource,
                    attempt = attempts,
                    error = %e,
                    "Retryable check error"
                );
            }
            Err(e) => {
                warn!(
                    resource = %resource,
                    attempt = attempts,
                    error = %e,
                    "Resource check failed"
                );
                return Err(WaitError::Check {
                    resource: resource.to_string(),
                    error: e,
                });
            }
        }
    }

    Err(WaitError::Timeout {
        resource: resource.to_string(),
        timeout: config.timeout,
        attempts,
    })
}

async fn cancelled(cancel: Option<&CancellationToken>) {
    match cancel {
        Some(token) => token.cancelled().await,
        None => std::future::pending::<()>().await,
    }
}
