//! Fleet resources as the tool sees them.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};

/// Tag key used to scope bulk operations.
pub const PROJECT_TAG: &str = "Project";

const NO_PROJECT: &str = "<no project>";

/// EC2 instance lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceState {
    Pending,
    Running,
    Stopping,
    Stopped,
    ShuttingDown,
    Terminated,
    Unknown,
}

impl InstanceState {
    pub fn from_api(value: &str) -> Self {
        match value {
            "pending" => Self::Pending,
            "running" => Self::Running,
            "stopping" => Self::Stopping,
            "stopped" => Self::Stopped,
            "shutting-down" => Self::ShuttingDown,
            "terminated" => Self::Terminated,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Stopping => "stopping",
            Self::Stopped => "stopped",
            Self::ShuttingDown => "shutting-down",
            Self::Terminated => "terminated",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for InstanceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// EBS snapshot state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotState {
    Pending,
    Completed,
    Error,
    Unknown,
}

impl SnapshotState {
    pub fn from_api(value: &str) -> Self {
        match value {
            "pending" => Self::Pending,
            "completed" => Self::Completed,
            "error" => Self::Error,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Error => "error",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for SnapshotState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// EC2 instance.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    pub id: String,
    pub instance_type: String,
    pub availability_zone: String,
    pub state: InstanceState,
    pub public_dns_name: String,
    pub tags: BTreeMap<String, String>,
}

impl Instance {
    /// Value of the `Project` tag, if any.
    pub fn project(&self) -> Option<&str> {
        self.tags.get(PROJECT_TAG).map(String::as_str)
    }

    pub fn belongs_to(&self, project: &str) -> bool {
        self.project() == Some(project)
    }

    /// `id, type, az, state, dns, project`
    pub fn to_line(&self) -> String {
        [
            self.id.as_str(),
            self.instance_type.as_str(),
            self.availability_zone.as_str(),
            self.state.as_str(),
            self.public_dns_name.as_str(),
            self.project().unwrap_or(NO_PROJECT),
        ]
        .join(", ")
    }
}

/// EBS volume attached to an instance.
#[derive(Debug, Clone, PartialEq)]
pub struct Volume {
    pub id: String,
    pub instance_id: String,
    pub size_gib: i32,
    pub encrypted: bool,
    pub state: String,
}

impl Volume {
    /// `vol-id, instance-id, state, sizeGiB, Encrypted|Not Encrypted`
    pub fn to_line(&self) -> String {
        format!(
            "{}, {}, {}, {}GiB, {}",
            self.id,
            self.instance_id,
            self.state,
            self.size_gib,
            if self.encrypted {
                "Encrypted"
            } else {
                "Not Encrypted"
            }
        )
    }
}

/// EBS snapshot of a volume.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub id: String,
    pub volume_id: String,
    pub state: SnapshotState,
    pub progress: String,
    pub start_time: Option<DateTime<Utc>>,
    pub description: String,
}

impl Snapshot {
    pub fn is_pending(&self) -> bool {
        self.state == SnapshotState::Pending
    }

    pub fn is_completed(&self) -> bool {
        self.state == SnapshotState::Completed
    }

    /// `snap-id, vol-id, instance-id, state, progress, start time`
    pub fn to_line(&self, instance_id: &str) -> String {
        let started = self
            .start_time
            .map(|t| t.format("%c").to_string())
            .unwrap_or_else(|| "-".to_string());

        [
            self.id.as_str(),
            self.volume_id.as_str(),
            instance_id,
            self.state.as_str(),
            self.progress.as_str(),
            started.as_str(),
        ]
        .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn instance(tags: &[(&str, &str)]) -> Instance {
        Instance {
            id: "i-0123456789abcdef0".to_string(),
            instance_type: "t3.micro".to_string(),
            availability_zone: "us-east-1a".to_string(),
            state: InstanceState::Running,
            public_dns_name: "ec2-1-2-3-4.compute-1.amazonaws.com".to_string(),
            tags: tags
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    mod state_tests {
        use super::*;

        #[test]
        fn test_instance_state_round_trips_api_names() {
            for name in [
                "pending",
                "running",
                "stopping",
                "stopped",
                "shutting-down",
                "terminated",
            ] {
                assert_eq!(InstanceState::from_api(name).as_str(), name);
            }
        }

        #[test]
        fn test_instance_state_unknown_value() {
            assert_eq!(InstanceState::from_api("hibernating"), InstanceState::Unknown);
            assert_eq!(InstanceState::from_api("Running"), InstanceState::Unknown);
        }

        #[test]
        fn test_snapshot_state_parsing() {
            assert_eq!(SnapshotState::from_api("pending"), SnapshotState::Pending);
            assert_eq!(SnapshotState::from_api("completed"), SnapshotState::Completed);
            assert_eq!(SnapshotState::from_api("error"), SnapshotState::Error);
            assert_eq!(SnapshotState::from_api("recoverable"), SnapshotState::Unknown);
        }
    }

    mod line_tests {
        use super::*;

        #[test]
        fn test_instance_line_with_project() {
            let i = instance(&[("Project", "demo"), ("Name", "web")]);
            assert_eq!(
                i.to_line(),
                "i-0123456789abcdef0, t3.micro, us-east-1a, running, ec2-1-2-3-4.compute-1.amazonaws.com, demo"
            );
        }

        #[test]
        fn test_instance_line_without_project() {
            let i = instance(&[("Name", "web")]);
            assert!(i.to_line().ends_with(", <no project>"));
        }

        #[test]
        fn test_volume_line() {
            let v = Volume {
                id: "vol-1".to_string(),
                instance_id: "i-1".to_string(),
                size_gib: 8,
                encrypted: false,
                state: "in-use".to_string(),
            };
            assert_eq!(v.to_line(), "vol-1, i-1, in-use, 8GiB, Not Encrypted");

            let encrypted = Volume {
                encrypted: true,
                ..v
            };
            assert!(encrypted.to_line().ends_with(", Encrypted"));
        }

        #[test]
        fn test_snapshot_line() {
            let s = Snapshot {
                id: "snap-1".to_string(),
                volume_id: "vol-1".to_string(),
                state: SnapshotState::Completed,
                progress: "100%".to_string(),
                start_time: Some(Utc.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap()),
                description: String::new(),
            };
            assert_eq!(
                s.to_line("i-1"),
                "snap-1, vol-1, i-1, completed, 100%, Tue Mar  5 14:07:09 2024"
            );
        }

        #[test]
        fn test_snapshot_line_without_start_time() {
            let s = Snapshot {
                id: "snap-1".to_string(),
                volume_id: "vol-1".to_string(),
                state: SnapshotState::Pending,
                progress: String::new(),
                start_time: None,
                description: String::new(),
            };
            assert!(s.to_line("i-1").ends_with(", pending, , -"));
        }
    }

    #[test]
    fn test_project_membership_is_exact() {
        let i = instance(&[("Project", "demo")]);
        assert!(i.belongs_to("demo"));
        assert!(!i.belongs_to("Demo"));
        assert!(!i.belongs_to("demo-2"));
        assert!(!instance(&[]).belongs_to("demo"));
    }
}
