use std::time::Duration;

use aws_config::BehaviorVersion;
use aws_sdk_ec2::Client;
use tracing::{debug, info};

/// EC2 client wrapper bound to one profile and region.
pub struct Ec2Client {
    pub(super) client: Client,
    pub(super) region: String,
    pub(super) max_wait: Duration,
}

impl Ec2Client {
    /// Creates a new EC2 client from the shared AWS configuration.
    ///
    /// Credentials come from the named profile in the standard AWS credential
    /// store. Region resolution priority:
    /// 1. Explicit region (--region CLI arg or AWS_REGION env var)
    /// 2. The profile's region in ~/.aws/config
    pub async fn new(profile: Option<&str>, region: Option<&str>, max_wait: Duration) -> Self {
        let config = Self::load_aws_config(profile, region).await;
        let region = config
            .region()
            .map(|r| r.to_string())
            .unwrap_or_else(|| "unknown".to_string());

        info!(
            region = %region,
            profile = profile.unwrap_or("default"),
            max_wait_seconds = max_wait.as_secs(),
            "AWS EC2 client initialized"
        );

        Self {
            client: Client::new(&config),
            region,
            max_wait,
        }
    }

    async fn load_aws_config(profile: Option<&str>, region: Option<&str>) -> aws_config::SdkConfig {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());

        if let Some(profile) = profile {
            debug!(profile = %profile, "Using AWS profile");
            loader = loader.profile_name(profile);
        }

        if let Some(region) = region {
            debug!(region = %region, "Using explicit AWS region");
            loader = loader.region(aws_config::Region::new(region.to_string()));
        }

        loader.load().await
    }

    pub fn region(&self) -> &str {
        &self.region
    }
}
