//! Command handlers.
//!
//! [`FleetOperator`] owns nothing but a borrowed provider and the output sink.
//! Handlers run strictly one provider call at a time.

mod lifecycle;
mod listing;
mod snapshots;

use std::fmt::Display;
use std::io::Write;

pub use lifecycle::{LifecycleSummary, Transition};
pub use snapshots::SnapshotSummary;

use crate::error::Result;
use crate::provider::Ec2Provider;

/// Description attached to every snapshot shotty creates.
pub const SNAPSHOT_DESCRIPTION: &str = "Created by SnapshotAlyzer 30000";

pub struct FleetOperator<'a, P: ?Sized, W> {
    provider: &'a P,
    out: W,
    snapshot_description: String,
}

impl<'a, P, W> FleetOperator<'a, P, W>
where
    P: Ec2Provider + ?Sized,
    W: Write,
{
    pub fn new(provider: &'a P, out: W) -> Self {
        Self {
            provider,
            out,
            snapshot_description: SNAPSHOT_DESCRIPTION.to_string(),
        }
    }

    pub fn with_snapshot_description(mut self, description: impl Into<String>) -> Self {
        self.snapshot_description = description.into();
        self
    }

    pub fn into_output(self) -> W {
        self.out
    }

    fn line(&mut self, line: impl Display) -> Result<()> {
        writeln!(self.out, "{}", line)?;
        Ok(())
    }
}
