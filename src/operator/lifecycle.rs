use std::io::Write;

use tracing::{info, warn};

use super::FleetOperator;
use crate::error::Result;
use crate::fleet;
use crate::provider::Ec2Provider;

/// Lifecycle transition issued by `instances start|stop|reboot`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Start,
    Stop,
    Reboot,
}

impl Transition {
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Reboot => "reboot",
        }
    }

    fn progress(&self) -> &'static str {
        match self {
            Self::Start => "Starting",
            Self::Stop => "Stopping",
            Self::Reboot => "Rebooting",
        }
    }
}

/// Outcome of a bulk lifecycle transition.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LifecycleSummary {
    pub succeeded: Vec<String>,
    pub failed: Vec<String>,
}

impl<P, W> FleetOperator<'_, P, W>
where
    P: Ec2Provider + ?Sized,
    W: Write,
{
    /// Issue `transition` against every instance in the working set.
    ///
    /// Does not wait for the instances to settle.
    pub async fn transition_instances(
        &mut self,
        transition: Transition,
        project: Option<&str>,
        force: bool,
    ) -> Result<LifecycleSummary> {
        fleet::require_scope(transition.verb(), project, force)?;

        let instances = fleet::filter_instances(self.provider, project).await?;
        let mut summary = LifecycleSummary::default();

        for instance in &instances {
            self.line(format!("{} {}...", transition.progress(), instance.id))?;

            let result = match transition {
                Transition::Start => self.provider.start_instance(&instance.id).await,
                Transition::Stop => self.provider.stop_instance(&instance.id).await,
                Transition::Reboot => self.provider.reboot_instance(&instance.id).await,
            };

            match result {
                Ok(()) => summary.succeeded.push(instance.id.clone()),
                Err(e) if e.is_resource_error() => {
                    warn!(
                        instance_id = %instance.id,
                        action = transition.verb(),
                        error = %e,
                        "Instance transition failed, continuing"
                    );
                    self.line(format!(
                        "Could not {} {}: {}",
                        transition.verb(),
                        instance.id,
                        e
                    ))?;
                    summary.failed.push(instance.id.clone());
                }
                Err(e) => return Err(e),
            }
        }

        info!(
            action = transition.verb(),
            project = project.unwrap_or("<all>"),
            succeeded = summary.succeeded.len(),
            failed = summary.failed.len(),
            "Instance transition complete"
        );
        Ok(summary)
    }

    pub async fn start_instances(&mut self, project: Option<&str>, force: bool) -> Result<LifecycleSummary> {
        self.transition_instances(Transition::Start, project, force).await
    }

    pub async fn stop_instances(&mut self, project: Option<&str>, force: bool) -> Result<LifecycleSummary> {
        self.transition_instances(Transition::Stop, project, force).await
    }

    pub async fn reboot_instances(&mut self, project: Option<&str>, force: bool) -> Result<LifecycleSummary> {
        self.transition_instances(Transition::Reboot, project, force).await
    }
}
