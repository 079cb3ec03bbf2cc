//! # Configuration
//!
//! - `broker`: broker settings from environment variables
//! - `definition`: deployment definition file (app name, streams, cluster metadata)

pub mod broker;
pub mod definition;

pub use broker::BrokerConfig;
pub use definition::{ClusterMetadata, DeploymentDefinition};
