//! # Deployment Definition
//!
//! The slice of the deployment definition the broker consumes: application
//! name, declared streams and cluster metadata.
//!
//! ```yaml
//! appName: orders-svc
//! streams:
//!   - name: orders-stream
//!     shardCount: 2
//! cluster:
//!   sbuTag: retail
//!   orgTag: payments
//!   clusterId: ecs-prod-1
//! ```

use crate::config::BrokerConfig;
use crate::model::{OwnershipTag, OwnershipTags, StreamSpec};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Deployment definition
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentDefinition {
    /// Application name, also the ownership tag value
    pub app_name: String,
    /// Declared streams; absent means "none declared"
    #[serde(default)]
    pub streams: Option<Vec<StreamSpec>>,
    /// Metadata of the cluster the application is deployed to
    #[serde(default)]
    pub cluster: ClusterMetadata,
}

/// Cluster metadata used for tagging
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterMetadata {
    #[serde(default)]
    pub sbu_tag: String,
    #[serde(default)]
    pub org_tag: String,
    #[serde(default)]
    pub cluster_id: String,
}

impl DeploymentDefinition {
    /// Load a definition from a YAML or JSON file
    ///
    /// Files ending in `.json` are parsed as JSON, everything else as YAML.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read definition {}", path.display()))?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            serde_json::from_str(&raw)
                .with_context(|| format!("Failed to parse JSON definition {}", path.display()))
        } else {
            Self::from_yaml(&raw)
                .with_context(|| format!("Failed to parse YAML definition {}", path.display()))
        }
    }

    /// Parse a definition from YAML text
    pub fn from_yaml(raw: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(raw)?)
    }

    /// Declared streams, empty when none are declared
    #[must_use]
    pub fn streams(&self) -> &[StreamSpec] {
        self.streams.as_deref().unwrap_or_default()
    }

    /// Build the ownership tags for this deployment
    #[must_use]
    pub fn ownership_tags(&self, config: &BrokerConfig) -> OwnershipTags {
        OwnershipTags {
            sbu: OwnershipTag::new(&config.sbu_tag_key, &self.cluster.sbu_tag),
            org: OwnershipTag::new(&config.org_tag_key, &self.cluster.org_tag),
            app: OwnershipTag::new(&config.app_tag_key, &self.app_name),
            cluster: OwnershipTag::new(&config.cluster_tag_key, &self.cluster.cluster_id),
        }
    }
}
