//! Kinesis Broker Library
//!
//! Reconciles the Kinesis data streams a deployment declares: existing
//! streams are adopted, missing ones are created, tagged and encrypted, and
//! owned streams that are no longer declared are swept.
//!
//! ## Quick Start
//!
//! ```rust
//! use kinesis_broker::prelude::*;
//! ```
//!
//! This brings commonly used types and traits into scope. For more specific imports,
//! use the individual modules.

pub mod cli;
pub mod config;
pub mod constants;
pub mod controller;
pub mod model;
pub mod observability;
pub mod prelude;
pub mod provider;
