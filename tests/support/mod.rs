//! In-memory EC2 used by the integration tests.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};

use shotty::error::{Result, ShottyError};
use shotty::model::{Instance, InstanceState, Snapshot, SnapshotState, Volume};
use shotty::provider::Ec2Provider;

/// Provider calls a test can make fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Volumes,
    Snapshots,
    Start,
    Stop,
    Reboot,
    WaitRunning,
    WaitStopped,
    CreateSnapshot,
}

/// Mutating calls, in the order they were made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    Start(String),
    Stop(String),
    Reboot(String),
    CreateSnapshot(String),
}

#[derive(Default)]
struct State {
    instances: Vec<Instance>,
    volumes: Vec<Volume>,
    snapshots: Vec<Snapshot>,
    mutations: Vec<Mutation>,
    failures: HashSet<(Op, String)>,
    fatal: HashSet<(Op, String)>,
    ignore_project_filter: bool,
    next_snapshot: u32,
}

#[derive(Default)]
pub struct FakeProvider {
    state: Mutex<State>,
}

fn at_hour(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0).unwrap()
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_instance(self, id: &str, state: InstanceState, project: Option<&str>) -> Self {
        let mut tags = BTreeMap::new();
        tags.insert("Name".to_string(), format!("{}-name", id));
        if let Some(project) = project {
            tags.insert("Project".to_string(), project.to_string());
        }

        self.state.lock().unwrap().instances.push(Instance {
            id: id.to_string(),
            instance_type: "t3.micro".to_string(),
            availability_zone: "us-east-1a".to_string(),
            state,
            public_dns_name: format!("{}.compute-1.amazonaws.com", id),
            tags,
        });
        self
    }

    pub fn with_volume(self, id: &str, instance_id: &str) -> Self {
        self.state.lock().unwrap().volumes.push(Volume {
            id: id.to_string(),
            instance_id: instance_id.to_string(),
            size_gib: 8,
            encrypted: false,
            state: "in-use".to_string(),
        });
        self
    }

    pub fn with_snapshot(self, id: &str, volume_id: &str, state: SnapshotState, hour: u32) -> Self {
        self.state.lock().unwrap().snapshots.push(Snapshot {
            id: id.to_string(),
            volume_id: volume_id.to_string(),
            state,
            progress: if state == SnapshotState::Completed {
                "100%".to_string()
            } else {
                "10%".to_string()
            },
            start_time: Some(at_hour(hour)),
            description: String::new(),
        });
        self
    }

    /// Make `op` on `resource` fail with a service error.
    pub fn failing(self, op: Op, resource: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .failures
            .insert((op, resource.to_string()));
        self
    }

    /// Make `op` on `resource` fail as if the API was unreachable.
    pub fn unreachable(self, op: Op, resource: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .fatal
            .insert((op, resource.to_string()));
        self
    }

    /// Return every instance no matter which project is asked for.
    pub fn ignoring_project_filter(self) -> Self {
        self.state.lock().unwrap().ignore_project_filter = true;
        self
    }

    pub fn mutations(&self) -> Vec<Mutation> {
        self.state.lock().unwrap().mutations.clone()
    }

    pub fn instance_state(&self, id: &str) -> InstanceState {
        self.state
            .lock()
            .unwrap()
            .instances
            .iter()
            .find(|i| i.id == id)
            .map(|i| i.state)
            .unwrap_or(InstanceState::Unknown)
    }

    pub fn snapshots_of(&self, volume_id: &str) -> Vec<Snapshot> {
        self.state
            .lock()
            .unwrap()
            .snapshots
            .iter()
            .filter(|s| s.volume_id == volume_id)
            .cloned()
            .collect()
    }

    fn check(state: &State, op: Op, resource: &str) -> Result<()> {
        let key = (op, resource.to_string());
        if state.fatal.contains(&key) {
            return Err(ShottyError::Transport(format!(
                "dispatch failure while calling {:?}",
                op
            )));
        }
        if state.failures.contains(&key) {
            return Err(ShottyError::Client {
                resource: resource.to_string(),
                code: "InjectedFailure".to_string(),
                message: format!("{:?} rejected", op),
            });
        }
        Ok(())
    }

    fn transition(&self, op: Op, id: &str, to: Option<InstanceState>, record: Mutation) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        Self::check(&state, op, id)?;
        state.mutations.push(record);

        let instance = state
            .instances
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| ShottyError::Client {
                resource: id.to_string(),
                code: "InvalidInstanceID.NotFound".to_string(),
                message: "no such instance".to_string(),
            })?;
        if let Some(to) = to {
            instance.state = to;
        }
        Ok(())
    }

    fn wait_for(&self, op: Op, id: &str, target: InstanceState) -> Result<()> {
        let state = self.state.lock().unwrap();
        if Self::check(&state, op, id).is_err() {
            return Err(ShottyError::Wait {
                resource: id.to_string(),
                state: target.to_string(),
                message: "waiter entered a failure state".to_string(),
            });
        }

        let current = state.instances.iter().find(|i| i.id == id).map(|i| i.state);
        if current == Some(target) {
            Ok(())
        } else {
            Err(ShottyError::Wait {
                resource: id.to_string(),
                state: target.to_string(),
                message: format!("instance is {:?}", current),
            })
        }
    }
}

#[async_trait]
impl Ec2Provider for FakeProvider {
    async fn instances(&self, project: Option<&str>) -> Result<Vec<Instance>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .instances
            .iter()
            .filter(|i| state.ignore_project_filter || project.is_none_or(|p| i.belongs_to(p)))
            .cloned()
            .collect())
    }

    async fn instance(&self, instance_id: &str) -> Result<Option<Instance>> {
        let state = self.state.lock().unwrap();
        Ok(state.instances.iter().find(|i| i.id == instance_id).cloned())
    }

    async fn volumes(&self, instance_id: &str) -> Result<Vec<Volume>> {
        let state = self.state.lock().unwrap();
        Self::check(&state, Op::Volumes, instance_id)?;
        Ok(state
            .volumes
            .iter()
            .filter(|v| v.instance_id == instance_id)
            .cloned()
            .collect())
    }

    async fn snapshots(&self, volume_id: &str) -> Result<Vec<Snapshot>> {
        let state = self.state.lock().unwrap();
        Self::check(&state, Op::Snapshots, volume_id)?;
        Ok(state
            .snapshots
            .iter()
            .filter(|s| s.volume_id == volume_id)
            .cloned()
            .collect())
    }

    async fn start_instance(&self, instance_id: &str) -> Result<()> {
        self.transition(
            Op::Start,
            instance_id,
            Some(InstanceState::Running),
            Mutation::Start(instance_id.to_string()),
        )
    }

    async fn stop_instance(&self, instance_id: &str) -> Result<()> {
        self.transition(
            Op::Stop,
            instance_id,
            Some(InstanceState::Stopped),
            Mutation::Stop(instance_id.to_string()),
        )
    }

    async fn reboot_instance(&self, instance_id: &str) -> Result<()> {
        self.transition(
            Op::Reboot,
            instance_id,
            None,
            Mutation::Reboot(instance_id.to_string()),
        )
    }

    async fn wait_until_running(&self, instance_id: &str) -> Result<()> {
        self.wait_for(Op::WaitRunning, instance_id, InstanceState::Running)
    }

    async fn wait_until_stopped(&self, instance_id: &str) -> Result<()> {
        self.wait_for(Op::WaitStopped, instance_id, InstanceState::Stopped)
    }

    async fn create_snapshot(&self, volume_id: &str, description: &str) -> Result<Snapshot> {
        let mut state = self.state.lock().unwrap();
        Self::check(&state, Op::CreateSnapshot, volume_id)?;
        state
            .mutations
            .push(Mutation::CreateSnapshot(volume_id.to_string()));

        state.next_snapshot += 1;
        let snapshot = Snapshot {
            id: format!("snap-new-{}", state.next_snapshot),
            volume_id: volume_id.to_string(),
            state: SnapshotState::Pending,
            progress: String::new(),
            start_time: Some(at_hour(23) + Duration::minutes(i64::from(state.next_snapshot))),
            description: description.to_string(),
        };
        state.snapshots.push(snapshot.clone());
        Ok(snapshot)
    }
}
