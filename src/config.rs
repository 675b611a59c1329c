//! CLI arguments and runtime configuration.

use std::time::Duration;

use clap::{Args as ClapArgs, Parser, Subcommand};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const COMMIT: &str = env!("GIT_COMMIT");
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Manage EC2 instances, volumes and snapshots by Project tag.
#[derive(Parser, Debug, Clone)]
#[command(name = "shotty")]
#[command(about = "shotty manages snapshots")]
#[command(version = const_format::formatcp!(
    "{} (commit: {}, build date: {})",
    VERSION, COMMIT, BUILD_DATE
))]
pub struct Args {
    /// AWS profile from the shared credentials file
    #[arg(long, global = true, env = "SHOTTY_PROFILE", default_value = "shotty")]
    pub profile: String,

    /// AWS region (defaults to the profile's region)
    #[arg(long, global = true, env = "AWS_REGION")]
    pub region: Option<String>,

    /// Maximum seconds to wait for an instance to stop or start
    #[arg(long, global = true, default_value = "600")]
    pub wait_timeout: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "SHOTTY_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,

    /// Log format: pretty or json
    #[arg(long, global = true, env = "SHOTTY_LOG_FORMAT", default_value = "pretty")]
    pub log_format: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Commands for volumes
    #[command(subcommand)]
    Volumes(VolumesCommand),

    /// Commands for snapshots
    #[command(subcommand)]
    Snapshots(SnapshotsCommand),

    /// Commands for instances
    #[command(subcommand)]
    Instances(InstancesCommand),
}

#[derive(Subcommand, Debug, Clone)]
pub enum VolumesCommand {
    /// List EBS volumes
    List {
        #[command(flatten)]
        scope: ListScope,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum SnapshotsCommand {
    /// List volume snapshots
    List {
        #[command(flatten)]
        scope: ListScope,

        /// List all snapshots for each volume, not just the most recent
        #[arg(long)]
        all: bool,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum InstancesCommand {
    /// List EC2 instances
    List {
        /// Only instances for project (tag Project:<name>)
        #[arg(long)]
        project: Option<String>,
    },

    /// Start EC2 instances
    Start(BulkScope),

    /// Stop EC2 instances
    Stop(BulkScope),

    /// Reboot EC2 instances
    Reboot(BulkScope),

    /// Stop instances, snapshot all volumes, restart the ones that were running
    Snapshots(BulkScope),
}

/// Scope for read-only listings.
#[derive(ClapArgs, Debug, Clone, Default)]
pub struct ListScope {
    /// Only resources for project (tag Project:<name>)
    #[arg(long)]
    pub project: Option<String>,

    /// Only resources of this instance
    #[arg(long)]
    pub instance_id: Option<String>,
}

/// Scope for mutating bulk operations.
#[derive(ClapArgs, Debug, Clone, Default)]
pub struct BulkScope {
    /// Only instances for project (tag Project:<name>)
    #[arg(long)]
    pub project: Option<String>,

    /// Run against every instance when no project is given
    #[arg(long)]
    pub force: bool,
}

/// Application configuration derived from CLI args.
#[derive(Debug, Clone)]
pub struct Config {
    pub profile: String,
    pub region: Option<String>,
    pub wait_timeout: Duration,
    pub log_level: String,
    pub log_format: String,
    pub command: Command,
}

impl Config {
    /// Create config from CLI arguments.
    pub fn from_args(args: Args) -> Self {
        Self {
            profile: args.profile,
            region: args.region.filter(|r| !r.trim().is_empty()),
            wait_timeout: Duration::from_secs(args.wait_timeout),
            log_level: args.log_level,
            log_format: args.log_format,
            command: args.command,
        }
    }
}
