//! shotty - manage EC2 instances, EBS volumes and snapshots scoped by the
//! `Project` tag.

pub mod config;
pub mod ec2;
pub mod error;
pub mod fleet;
pub mod logging;
pub mod model;
pub mod operator;
pub mod provider;
pub mod snapshot;
