//! # Model
//!
//! Desired-state and live-state types shared by the broker and its providers.

pub mod spec;
pub mod status;
pub mod tags;

pub use spec::StreamSpec;
pub use status::StreamStatus;
pub use tags::{OwnershipTag, OwnershipTags};
