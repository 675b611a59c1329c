use std::io::Write;

use tracing::{debug, info, warn};

use super::FleetOperator;
use crate::error::{Result, ShottyError};
use crate::fleet;
use crate::model::{Instance, InstanceState};
use crate::provider::Ec2Provider;
use crate::snapshot;

/// Outcome of `instances snapshots`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SnapshotSummary {
    /// Ids of the snapshots that were requested.
    pub created: Vec<String>,
    /// Volumes skipped because their latest snapshot is still pending.
    pub skipped_pending: Vec<String>,
    /// Instances or volumes an operation failed on.
    pub failed: Vec<String>,
    /// Instances started again after the snapshots were requested.
    pub restarted: Vec<String>,
}

impl<P, W> FleetOperator<'_, P, W>
where
    P: Ec2Provider + ?Sized,
    W: Write,
{
    /// Stop each instance, snapshot its volumes, then start it again if it
    /// was running to begin with.
    pub async fn snapshot_instances(
        &mut self,
        project: Option<&str>,
        force: bool,
    ) -> Result<SnapshotSummary> {
        fleet::require_scope("snapshot", project, force)?;

        let instances = fleet::filter_instances(self.provider, project).await?;
        let mut summary = SnapshotSummary::default();

        for instance in &instances {
            self.snapshot_instance(instance, &mut summary).await?;
        }

        info!(
            project = project.unwrap_or("<all>"),
            instances = instances.len(),
            created = summary.created.len(),
            skipped_pending = summary.skipped_pending.len(),
            failed = summary.failed.len(),
            restarted = summary.restarted.len(),
            "Snapshot run complete"
        );
        Ok(summary)
    }

    async fn snapshot_instance(&mut self, instance: &Instance, summary: &mut SnapshotSummary) -> Result<()> {
        let original_state = instance.state;
        debug!(
            instance_id = %instance.id,
            original_state = %original_state,
            "Recorded instance state"
        );

        let volumes = match self.provider.volumes(&instance.id).await {
            Ok(volumes) => volumes,
            Err(e) => return self.skip(&instance.id, "list volumes of", e, summary),
        };

        if original_state != InstanceState::Stopped {
            self.line(format!("Stopping {}...", instance.id))?;

            let stopped = match self.provider.stop_instance(&instance.id).await {
                Ok(()) => self.provider.wait_until_stopped(&instance.id).await,
                Err(e) => Err(e),
            };
            if let Err(e) = stopped {
                return self.skip(&instance.id, "stop", e, summary);
            }
        }

        for volume in &volumes {
            let existing = match self.provider.snapshots(&volume.id).await {
                Ok(existing) => existing,
                Err(e) => {
                    self.skip(&volume.id, "list snapshots of", e, summary)?;
                    continue;
                }
            };

            if snapshot::has_pending_snapshot(&existing) {
                info!(
                    instance_id = %instance.id,
                    volume_id = %volume.id,
                    "Latest snapshot still pending, skipping volume"
                );
                self.line(format!(
                    "Skipping {}, snapshot already in progress",
                    volume.id
                ))?;
                summary.skipped_pending.push(volume.id.clone());
                continue;
            }

            self.line(format!("Creating snapshot of {}", volume.id))?;
            let description = self.snapshot_description.clone();
            match self.provider.create_snapshot(&volume.id, &description).await {
                Ok(created) => summary.created.push(created.id),
                Err(e) => self.skip(&volume.id, "snapshot", e, summary)?,
            }
        }

        if original_state == InstanceState::Running {
            self.line(format!("Starting {}...", instance.id))?;

            let started = match self.provider.start_instance(&instance.id).await {
                Ok(()) => self.provider.wait_until_running(&instance.id).await,
                Err(e) => Err(e),
            };
            match started {
                Ok(()) => summary.restarted.push(instance.id.clone()),
                Err(e) => self.skip(&instance.id, "start", e, summary)?,
            }
        } else {
            debug!(
                instance_id = %instance.id,
                original_state = %original_state,
                "Instance was not running, leaving it stopped"
            );
        }

        Ok(())
    }

    /// Record a resource error and carry on; anything else is fatal.
    fn skip(
        &mut self,
        resource: &str,
        action: &str,
        err: ShottyError,
        summary: &mut SnapshotSummary,
    ) -> Result<()> {
        if !err.is_resource_error() {
            return Err(err);
        }

        warn!(
            resource = %resource,
            action = %action,
            error = %err,
            "Operation failed, continuing"
        );
        self.line(format!("Could not {} {}: {}", action, resource, err))?;
        summary.failed.push(resource.to_string());
        Ok(())
    }
}
