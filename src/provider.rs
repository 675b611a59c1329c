//! The seam between the fleet operator and the cloud.

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{Instance, Snapshot, Volume};

/// Everything shotty needs from EC2.
///
/// Every call is a single (possibly paginated) request. Mutating calls return
/// once the request is accepted; the `wait_until_*` calls block until the
/// instance reaches the state or the provider gives up.
#[async_trait]
pub trait Ec2Provider: Send + Sync {
    /// Instances, restricted to `Project=<project>` when given.
    async fn instances(&self, project: Option<&str>) -> Result<Vec<Instance>>;

    async fn instance(&self, instance_id: &str) -> Result<Option<Instance>>;

    /// Volumes attached to the instance.
    async fn volumes(&self, instance_id: &str) -> Result<Vec<Volume>>;

    /// Snapshots of the volume, in whatever order the provider returns them.
    async fn snapshots(&self, volume_id: &str) -> Result<Vec<Snapshot>>;

    async fn start_instance(&self, instance_id: &str) -> Result<()>;

    async fn stop_instance(&self, instance_id: &str) -> Result<()>;

    async fn reboot_instance(&self, instance_id: &str) -> Result<()>;

    async fn wait_until_running(&self, instance_id: &str) -> Result<()>;

    async fn wait_until_stopped(&self, instance_id: &str) -> Result<()>;

    async fn create_snapshot(&self, volume_id: &str, description: &str) -> Result<Snapshot>;
}
