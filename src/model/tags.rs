//! # Ownership Tags
//!
//! Tags stamped onto every stream the broker creates.
//!
//! | Tag Key (default) | Value |
//! |-------------------|-------|
//! | `sbu` | Business unit from cluster metadata |
//! | `org` | Organisation from cluster metadata |
//! | `appName` | Application name from the deployment definition |
//! | `clusterId` | ECS cluster id |
//!
//! The application-name pair is the ownership marker: sweep only ever deletes
//! streams carrying it.

use std::collections::HashMap;

/// A single key/value tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnershipTag {
    pub key: String,
    pub value: String,
}

impl OwnershipTag {
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Check whether a stream's tag map carries this tag
    #[must_use]
    pub fn is_present_in(&self, tags: &HashMap<String, String>) -> bool {
        tags.get(&self.key).is_some_and(|value| *value == self.value)
    }
}

/// The four tags applied to created streams
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnershipTags {
    pub sbu: OwnershipTag,
    pub org: OwnershipTag,
    pub app: OwnershipTag,
    pub cluster: OwnershipTag,
}

impl OwnershipTags {
    /// The tag identifying streams owned by this deployment
    #[must_use]
    pub fn owner(&self) -> &OwnershipTag {
        &self.app
    }

    /// Tags as a key/value map, ready for the provider call
    #[must_use]
    pub fn to_map(&self) -> HashMap<String, String> {
        [&self.sbu, &self.org, &self.app, &self.cluster]
            .into_iter()
            .map(|tag| (tag.key.clone(), tag.value.clone()))
            .collect()
    }
}
