//! Working set resolution and the bulk operation guard.

use tracing::{debug, warn};

use crate::error::{Result, ShottyError};
use crate::model::Instance;
use crate::provider::Ec2Provider;

/// Instances to operate on: all of them, or only `Project=<project>`.
///
/// The provider is asked to filter server-side; the tag is checked again here
/// so the result never contains another project's instances.
pub async fn filter_instances<P>(provider: &P, project: Option<&str>) -> Result<Vec<Instance>>
where
    P: Ec2Provider + ?Sized,
{
    let instances = provider.instances(project).await?;

    let Some(project) = project else {
        debug!(instance_count = instances.len(), "Selected all instances");
        return Ok(instances);
    };

    let total = instances.len();
    let selected: Vec<Instance> = instances
        .into_iter()
        .filter(|i| i.belongs_to(project))
        .collect();

    if selected.len() != total {
        warn!(
            project = %project,
            dropped = total - selected.len(),
            "Provider returned instances outside the project, ignoring them"
        );
    }

    debug!(
        project = %project,
        instance_count = selected.len(),
        "Selected project instances"
    );
    Ok(selected)
}

/// Working set for commands that also accept `--instance-id`.
pub async fn resolve_instances<P>(
    provider: &P,
    project: Option<&str>,
    instance_id: Option<&str>,
) -> Result<Vec<Instance>>
where
    P: Ec2Provider + ?Sized,
{
    let Some(instance_id) = instance_id else {
        return filter_instances(provider, project).await;
    };

    let instance = provider
        .instance(instance_id)
        .await?
        .ok_or_else(|| ShottyError::InstanceNotFound(instance_id.to_string()))?;

    match project {
        Some(project) if !instance.belongs_to(project) => {
            warn!(
                instance_id = %instance_id,
                project = %project,
                "Instance does not belong to the requested project"
            );
            Ok(Vec::new())
        }
        _ => Ok(vec![instance]),
    }
}

/// Refuse whole-fleet mutations unless a project or `--force` was given.
pub fn require_scope(operation: &str, project: Option<&str>, force: bool) -> Result<()> {
    if project.is_some() || force {
        if project.is_none() {
            warn!(operation = %operation, "Running against the whole fleet (--force)");
        }
        return Ok(());
    }

    Err(ShottyError::ScopeRequired {
        operation: operation.to_string(),
    })
}
