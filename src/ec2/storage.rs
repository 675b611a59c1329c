use aws_sdk_ec2::operation::create_snapshot::CreateSnapshotOutput;
use aws_sdk_ec2::primitives::DateTime as AwsDateTime;
use aws_sdk_ec2::types::Filter;
use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::Ec2Client;
use crate::error::{Result, ShottyError};
use crate::model::{Snapshot, SnapshotState, Volume};

const OWNER_SELF: &str = "self";

impl Ec2Client {
    pub(super) async fn describe_attached_volumes(&self, instance_id: &str) -> Result<Vec<Volume>> {
        let filter = Filter::builder()
            .name("attachment.instance-id")
            .values(instance_id)
            .build();

        let mut pages = self
            .client
            .describe_volumes()
            .filters(filter)
            .into_paginator()
            .send();

        let mut volumes = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| ShottyError::aws(instance_id, e))?;
            volumes.extend(
                page.volumes()
                    .iter()
                    .map(|v| Self::to_volume(v, instance_id)),
            );
        }

        debug!(
            instance_id = %instance_id,
            volume_count = volumes.len(),
            "Fetched attached volumes"
        );
        Ok(volumes)
    }

    pub(super) async fn describe_volume_snapshots(&self, volume_id: &str) -> Result<Vec<Snapshot>> {
        let filter = Filter::builder().name("volume-id").values(volume_id).build();

        let mut pages = self
            .client
            .describe_snapshots()
            .owner_ids(OWNER_SELF)
            .filters(filter)
            .into_paginator()
            .send();

        let mut snapshots = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| ShottyError::aws(volume_id, e))?;
            snapshots.extend(page.snapshots().iter().map(Self::to_snapshot));
        }

        debug!(
            volume_id = %volume_id,
            snapshot_count = snapshots.len(),
            "Fetched volume snapshots"
        );
        Ok(snapshots)
    }

    pub(super) async fn snapshot_volume(&self, volume_id: &str, description: &str) -> Result<Snapshot> {
        info!(
            volume_id = %volume_id,
            api_action = "CreateSnapshot",
            "Sending request to AWS EC2 API"
        );

        let output = self
            .client
            .create_snapshot()
            .volume_id(volume_id)
            .description(description)
            .send()
            .await
            .map_err(|e| ShottyError::aws(volume_id, e))?;

        let snapshot = Self::created_snapshot(&output, volume_id);
        info!(
            volume_id = %volume_id,
            snapshot_id = %snapshot.id,
            snapshot_state = %snapshot.state,
            "Snapshot creation initiated"
        );
        Ok(snapshot)
    }

    pub(super) fn to_volume(volume: &aws_sdk_ec2::types::Volume, instance_id: &str) -> Volume {
        Volume {
            id: volume.volume_id().unwrap_or("unknown").to_string(),
            instance_id: instance_id.to_string(),
            size_gib: volume.size().unwrap_or_default(),
            encrypted: volume.encrypted().unwrap_or(false),
            state: volume
                .state()
                .map(|s| s.as_str())
                .unwrap_or("unknown")
                .to_string(),
        }
    }

    pub(super) fn to_snapshot(snapshot: &aws_sdk_ec2::types::Snapshot) -> Snapshot {
        Snapshot {
            id: snapshot.snapshot_id().unwrap_or("unknown").to_string(),
            volume_id: snapshot.volume_id().unwrap_or("unknown").to_string(),
            state: snapshot
                .state()
                .map(|s| SnapshotState::from_api(s.as_str()))
                .unwrap_or(SnapshotState::Unknown),
            progress: snapshot.progress().unwrap_or_default().to_string(),
            start_time: snapshot.start_time().and_then(to_utc),
            description: snapshot.description().unwrap_or_default().to_string(),
        }
    }

    fn created_snapshot(output: &CreateSnapshotOutput, volume_id: &str) -> Snapshot {
        Snapshot {
            id: output.snapshot_id().unwrap_or("unknown").to_string(),
            volume_id: output.volume_id().unwrap_or(volume_id).to_string(),
            state: output
                .state()
                .map(|s| SnapshotState::from_api(s.as_str()))
                .unwrap_or(SnapshotState::Pending),
            progress: output.progress().unwrap_or_default().to_string(),
            start_time: output.start_time().and_then(to_utc),
            description: output.description().unwrap_or_default().to_string(),
        }
    }
}

fn to_utc(time: &AwsDateTime) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(time.secs(), time.subsec_nanos())
}
