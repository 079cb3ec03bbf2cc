//! # Observability
//!
//! - `build_log`: plain-text build log sink shown by the pipeline
//! - `logging`: structured `tracing` subscriber setup

pub mod build_log;
pub mod logging;

// Re-export for convenience
pub use build_log::{BufferedBuildLog, BuildLog, BuildLogEntry, BuildLogLevel, TracingBuildLog};
pub use logging::LogFormat;
