use std::io::Write;

use tracing::debug;

use super::FleetOperator;
use crate::error::Result;
use crate::fleet;
use crate::provider::Ec2Provider;
use crate::snapshot;

impl<P, W> FleetOperator<'_, P, W>
where
    P: Ec2Provider + ?Sized,
    W: Write,
{
    /// `instances list`. Returns the number of lines printed.
    pub async fn list_instances(&mut self, project: Option<&str>) -> Result<usize> {
        let instances = fleet::filter_instances(self.provider, project).await?;

        for instance in &instances {
            self.line(instance.to_line())?;
        }

        Ok(instances.len())
    }

    /// `volumes list`. Returns the number of lines printed.
    pub async fn list_volumes(
        &mut self,
        project: Option<&str>,
        instance_id: Option<&str>,
    ) -> Result<usize> {
        let instances = fleet::resolve_instances(self.provider, project, instance_id).await?;
        let mut printed = 0;

        for instance in &instances {
            for volume in self.provider.volumes(&instance.id).await? {
                self.line(volume.to_line())?;
                printed += 1;
            }
        }

        debug!(instances = instances.len(), volumes = printed, "Listed volumes");
        Ok(printed)
    }

    /// `snapshots list`. Returns the number of lines printed.
    pub async fn list_snapshots(
        &mut self,
        project: Option<&str>,
        show_all: bool,
        instance_id: Option<&str>,
    ) -> Result<usize> {
        let instances = fleet::resolve_instances(self.provider, project, instance_id).await?;
        let mut printed = 0;

        for instance in &instances {
            for volume in self.provider.volumes(&instance.id).await? {
                let snapshots = self.provider.snapshots(&volume.id).await?;

                for s in snapshot::select_for_listing(snapshots, show_all) {
                    self.line(s.to_line(&instance.id))?;
                    printed += 1;
                }
            }
        }

        debug!(
            instances = instances.len(),
            snapshots = printed,
            show_all = show_all,
            "Listed snapshots"
        );
        Ok(printed)
    }
}
