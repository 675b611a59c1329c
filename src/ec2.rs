//! AWS SDK implementation of [`Ec2Provider`].

mod client;
mod instances;
mod storage;

use async_trait::async_trait;

pub use client::Ec2Client;

use crate::error::Result;
use crate::model::{Instance, Snapshot, Volume};
use crate::provider::Ec2Provider;

#[async_trait]
impl Ec2Provider for Ec2Client {
    async fn instances(&self, project: Option<&str>) -> Result<Vec<Instance>> {
        self.describe_instances(project).await
    }

    async fn instance(&self, instance_id: &str) -> Result<Option<Instance>> {
        self.describe_instance(instance_id).await
    }

    async fn volumes(&self, instance_id: &str) -> Result<Vec<Volume>> {
        self.describe_attached_volumes(instance_id).await
    }

    async fn snapshots(&self, volume_id: &str) -> Result<Vec<Snapshot>> {
        self.describe_volume_snapshots(volume_id).await
    }

    async fn start_instance(&self, instance_id: &str) -> Result<()> {
        self.start(instance_id).await
    }

    async fn stop_instance(&self, instance_id: &str) -> Result<()> {
        self.stop(instance_id).await
    }

    async fn reboot_instance(&self, instance_id: &str) -> Result<()> {
        self.reboot(instance_id).await
    }

    async fn wait_until_running(&self, instance_id: &str) -> Result<()> {
        self.wait_running(instance_id).await
    }

    async fn wait_until_stopped(&self, instance_id: &str) -> Result<()> {
        self.wait_stopped(instance_id).await
    }

    async fn create_snapshot(&self, volume_id: &str, description: &str) -> Result<Snapshot> {
        self.snapshot_volume(volume_id, description).await
    }
}
