use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use tracing::{debug, error};

use shotty::config::{
    Args, BUILD_DATE, COMMIT, Command, Config, InstancesCommand, SnapshotsCommand, VERSION,
    VolumesCommand,
};
use shotty::ec2::Ec2Client;
use shotty::error::ShottyError;
use shotty::logging;
use shotty::operator::FleetOperator;

#[tokio::main]
async fn main() {
    let config = Config::from_args(Args::parse());
    logging::init(&config.log_format, &config.log_level);

    debug!(
        version = VERSION,
        commit = COMMIT,
        build_date = BUILD_DATE,
        profile = %config.profile,
        "shotty starting"
    );

    if let Err(e) = run(&config).await {
        match e.downcast_ref::<ShottyError>() {
            Some(guard @ ShottyError::ScopeRequired { .. }) => {
                println!("{}", guard.to_string().yellow());
            }
            _ => {
                error!(error = %format!("{:#}", e), "Command failed");
                eprintln!("{} {:#}", "Error:".red().bold(), e);
            }
        }
        std::process::exit(1);
    }
}

async fn run(config: &Config) -> Result<()> {
    let client = Ec2Client::new(
        Some(config.profile.as_str()),
        config.region.as_deref(),
        config.wait_timeout,
    )
    .await;

    let stdout = std::io::stdout();
    let mut operator = FleetOperator::new(&client, stdout.lock());

    match &config.command {
        Command::Volumes(VolumesCommand::List { scope }) => {
            operator
                .list_volumes(scope.project.as_deref(), scope.instance_id.as_deref())
                .await?;
        }
        Command::Snapshots(SnapshotsCommand::List { scope, all }) => {
            operator
                .list_snapshots(scope.project.as_deref(), *all, scope.instance_id.as_deref())
                .await?;
        }
        Command::Instances(InstancesCommand::List { project }) => {
            operator.list_instances(project.as_deref()).await?;
        }
        Command::Instances(InstancesCommand::Start(scope)) => {
            operator
                .start_instances(scope.project.as_deref(), scope.force)
                .await?;
        }
        Command::Instances(InstancesCommand::Stop(scope)) => {
            operator
                .stop_instances(scope.project.as_deref(), scope.force)
                .await?;
        }
        Command::Instances(InstancesCommand::Reboot(scope)) => {
            operator
                .reboot_instances(scope.project.as_deref(), scope.force)
                .await?;
        }
        Command::Instances(InstancesCommand::Snapshots(scope)) => {
            operator
                .snapshot_instances(scope.project.as_deref(), scope.force)
                .await?;
        }
    }

    debug!(region = client.region(), "Command finished");
    Ok(())
}
