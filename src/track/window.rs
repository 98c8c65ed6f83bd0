use chrono::{DateTime, Utc};

use crate::track::TrackPoint;

/// The points of a time-sorted track with `t0 <= timestamp <= t1`.
pub fn window_points(points: &[TrackPoint], t0: DateTime<Utc>, t1: DateTime<Utc>) -> &[TrackPoint] {
    let start = points.partition_point(|p| p.timestamp < t0);
    let end = points.partition_point(|p| p.timestamp <= t1);
    if start >= end {
        return &[];
    }
    &points[start..end]
}

/// Every `every`-th point, starting with the first. `every` of 0 or 1 keeps
/// the whole track.
pub fn downsample(points: &[TrackPoint], every: usize) -> Vec<TrackPoint> {
    points.iter().step_by(every.max(1)).cloned().collect()
}
