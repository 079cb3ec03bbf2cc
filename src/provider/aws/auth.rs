//! # AWS Authentication
//!
//! Handles AWS SDK configuration. Credentials always come from the default
//! provider chain (environment, profile, container or instance role).

use anyhow::{bail, Result};
use aws_config::SdkConfig;
use tracing::info;

/// AWS connection settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AwsConfig {
    /// Region override; the default chain decides when unset
    pub region: Option<String>,
    /// Named profile from the shared config files
    pub profile: Option<String>,
    /// Endpoint override, e.g. a local Kinesis emulator
    pub endpoint_url: Option<String>,
}

/// Build the SDK config for the given settings
pub async fn load_sdk_config(config: &AwsConfig) -> SdkConfig {
    let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());

    if let Some(region) = &config.region {
        loader = loader.region(aws_config::Region::new(region.clone()));
    }

    if let Some(profile) = &config.profile {
        info!("Using AWS profile: {}", profile);
        loader = loader.profile_name(profile);
    }

    if let Some(endpoint_url) = &config.endpoint_url {
        info!("Overriding Kinesis endpoint: {}", endpoint_url);
        loader = loader.endpoint_url(endpoint_url);
    }

    loader.load().await
}

/// Region the loaded config resolved to
pub fn configured_region(sdk_config: &SdkConfig) -> Result<String> {
    match sdk_config.region() {
        Some(region) => Ok(region.to_string()),
        None => bail!("No AWS region configured; pass --region or set AWS_REGION"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_config::Region;

    #[test]
    fn test_region_is_required() {
        let missing = SdkConfig::builder().build();
        let err = configured_region(&missing).unwrap_err();
        assert!(err.to_string().contains("No AWS region configured"));

        let set = SdkConfig::builder().region(Region::new("eu-west-1")).build();
        assert_eq!(configured_region(&set).unwrap(), "eu-west-1");
    }

    #[tokio::test]
    async fn test_explicit_region_wins() {
        let sdk_config = load_sdk_config(&AwsConfig {
            region: Some("ap-southeast-2".to_string()),
            profile: None,
            endpoint_url: Some("http://localhost:4567".to_string()),
        })
        .await;
        assert_eq!(configured_region(&sdk_config).unwrap(), "ap-southeast-2");
    }
}
