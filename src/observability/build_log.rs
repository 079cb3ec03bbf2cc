//! # Build Log
//!
//! Sink for the plain-text lines shown to whoever runs the deployment step.
//!
//! These are separate from the structured `tracing` output: the pipeline shows
//! build log lines verbatim, so they carry no fields.

use std::sync::{Mutex, PoisonError};

/// Line-oriented log sink with informational and error lines
pub trait BuildLog: Send + Sync {
    fn info(&self, message: &str);
    fn error(&self, message: &str);
}

/// Forwards build log lines to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingBuildLog;

impl BuildLog for TracingBuildLog {
    fn info(&self, message: &str) {
        tracing::info!(target: "build_log", "{}", message);
    }

    fn error(&self, message: &str) {
        tracing::error!(target: "build_log", "{}", message);
    }
}

/// Severity of a buffered line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildLogLevel {
    Info,
    Error,
}

/// One buffered build log line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildLogEntry {
    pub level: BuildLogLevel,
    pub message: String,
}

/// Keeps every line in memory, in order
///
/// Useful when the caller wants to render the lines itself, and in tests.
#[derive(Debug, Default)]
pub struct BufferedBuildLog {
    entries: Mutex<Vec<BuildLogEntry>>,
}

impl BufferedBuildLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, level: BuildLogLevel, message: &str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(BuildLogEntry {
                level,
                message: message.to_string(),
            });
    }

    /// Snapshot of all lines so far
    #[must_use]
    pub fn entries(&self) -> Vec<BuildLogEntry> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Messages of the given level, in order
    #[must_use]
    pub fn messages(&self, level: BuildLogLevel) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|entry| entry.level == level)
            .map(|entry| entry.message)
            .collect()
    }

    #[must_use]
    pub fn errors(&self) -> Vec<String> {
        self.messages(BuildLogLevel::Error)
    }

    #[must_use]
    pub fn infos(&self) -> Vec<String> {
        self.messages(BuildLogLevel::Info)
    }
}

impl BuildLog for BufferedBuildLog {
    fn info(&self, message: &str) {
        self.push(BuildLogLevel::Info, message);
    }

    fn error(&self, message: &str) {
        self.push(BuildLogLevel::Error, message);
    }
}
