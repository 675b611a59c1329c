use std::collections::BTreeMap;

use aws_sdk_ec2::client::Waiters;
use aws_sdk_ec2::error::ProvideErrorMetadata;
use aws_sdk_ec2::types::{Filter, Tag};
use tracing::{debug, info};

use super::Ec2Client;
use crate::error::{Result, ShottyError};
use crate::model::{Instance, InstanceState, PROJECT_TAG};

const INSTANCE_NOT_FOUND: &str = "InvalidInstanceID.NotFound";

impl Ec2Client {
    pub(super) async fn describe_instances(&self, project: Option<&str>) -> Result<Vec<Instance>> {
        let filters = project.map(|p| vec![Self::project_filter(p)]);

        debug!(
            region = %self.region,
            project = project.unwrap_or("<all>"),
            "Sending DescribeInstances API request"
        );

        let mut pages = self
            .client
            .describe_instances()
            .set_filters(filters)
            .into_paginator()
            .send();

        let mut instances = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| ShottyError::aws("DescribeInstances", e))?;
            instances.extend(
                page.reservations()
                    .iter()
                    .flat_map(|r| r.instances())
                    .map(Self::to_instance),
            );
        }

        debug!(instance_count = instances.len(), "Fetched instances");
        Ok(instances)
    }

    pub(super) async fn describe_instance(&self, instance_id: &str) -> Result<Option<Instance>> {
        let response = match self
            .client
            .describe_instances()
            .instance_ids(instance_id)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) if e.code() == Some(INSTANCE_NOT_FOUND) => return Ok(None),
            Err(e) => return Err(ShottyError::aws(instance_id, e)),
        };

        Ok(response
            .reservations()
            .iter()
            .flat_map(|r| r.instances())
            .map(Self::to_instance)
            .find(|i| i.id == instance_id))
    }

    pub(super) async fn start(&self, instance_id: &str) -> Result<()> {
        info!(instance_id = %instance_id, api_action = "StartInstances", "Sending request to AWS EC2 API");
        self.client
            .start_instances()
            .instance_ids(instance_id)
            .send()
            .await
            .map_err(|e| ShottyError::aws(instance_id, e))?;
        Ok(())
    }

    pub(super) async fn stop(&self, instance_id: &str) -> Result<()> {
        info!(instance_id = %instance_id, api_action = "StopInstances", "Sending request to AWS EC2 API");
        self.client
            .stop_instances()
            .instance_ids(instance_id)
            .send()
            .await
            .map_err(|e| ShottyError::aws(instance_id, e))?;
        Ok(())
    }

    pub(super) async fn reboot(&self, instance_id: &str) -> Result<()> {
        info!(instance_id = %instance_id, api_action = "RebootInstances", "Sending request to AWS EC2 API");
        self.client
            .reboot_instances()
            .instance_ids(instance_id)
            .send()
            .await
            .map_err(|e| ShottyError::aws(instance_id, e))?;
        Ok(())
    }

    pub(super) async fn wait_running(&self, instance_id: &str) -> Result<()> {
        debug!(instance_id = %instance_id, "Waiting for instance to reach running");
        self.client
            .wait_until_instance_running()
            .instance_ids(instance_id)
            .wait(self.max_wait)
            .await
            .map_err(|e| ShottyError::wait(instance_id, "running", e))?;
        Ok(())
    }

    pub(super) async fn wait_stopped(&self, instance_id: &str) -> Result<()> {
        debug!(instance_id = %instance_id, "Waiting for instance to reach stopped");
        self.client
            .wait_until_instance_stopped()
            .instance_ids(instance_id)
            .wait(self.max_wait)
            .await
            .map_err(|e| ShottyError::wait(instance_id, "stopped", e))?;
        Ok(())
    }

    fn project_filter(project: &str) -> Filter {
        Filter::builder()
            .name(format!("tag:{}", PROJECT_TAG))
            .values(project)
            .build()
    }

    pub(super) fn to_instance(instance: &aws_sdk_ec2::types::Instance) -> Instance {
        let state = instance
            .state()
            .and_then(|s| s.name())
            .map(|n| InstanceState::from_api(n.as_str()))
            .unwrap_or(InstanceState::Unknown);

        Instance {
            id: instance.instance_id().unwrap_or("unknown").to_string(),
            instance_type: instance
                .instance_type()
                .map(|t| t.as_str())
                .unwrap_or("unknown")
                .to_string(),
            availability_zone: instance
                .placement()
                .and_then(|p| p.availability_zone())
                .unwrap_or("unknown")
                .to_string(),
            state,
            public_dns_name: instance.public_dns_name().unwrap_or_default().to_string(),
            tags: Self::collect_tags(instance.tags()),
        }
    }

    fn collect_tags(tags: &[Tag]) -> BTreeMap<String, String> {
        tags.iter()
            .filter_map(|tag| {
                tag.key()
                    .map(|k| (k.to_string(), tag.value().unwrap_or_default().to_string()))
            })
            .collect()
    }
}
