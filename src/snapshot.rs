//! Snapshot ordering and selection.
//!
//! The provider makes no promise about the order snapshots come back in, so
//! everything here orders by start time before deciding what "latest" means.

use crate::model::Snapshot;

/// Sort newest first. Snapshots without a start time go last, ties keep the
/// provider order.
pub fn sort_newest_first(snapshots: &mut [Snapshot]) {
    snapshots.sort_by(|a, b| b.start_time.cmp(&a.start_time));
}

/// Most recent snapshot by start time.
pub fn latest(snapshots: &[Snapshot]) -> Option<&Snapshot> {
    snapshots.iter().fold(None, |newest, s| match newest {
        Some(n) if n.start_time >= s.start_time => Some(n),
        _ => Some(s),
    })
}

/// True when the latest snapshot is still being taken.
pub fn has_pending_snapshot(snapshots: &[Snapshot]) -> bool {
    latest(snapshots).is_some_and(Snapshot::is_pending)
}

/// Snapshots to print for one volume, newest first.
///
/// With `show_all` every snapshot is returned. Otherwise the list ends at the
/// most recent completed snapshot, so anything still in flight is shown along
/// with the last good one.
pub fn select_for_listing(mut snapshots: Vec<Snapshot>, show_all: bool) -> Vec<Snapshot> {
    sort_newest_first(&mut snapshots);

    if show_all {
        return snapshots;
    }

    if let Some(pos) = snapshots.iter().position(Snapshot::is_completed) {
        snapshots.truncate(pos + 1);
    }
    snapshots
}
