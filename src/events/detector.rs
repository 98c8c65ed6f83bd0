use serde::{Deserialize, Serialize};

use crate::circular::circular_diff;
use crate::events::{ManeuverEvent, ManeuverKind};
use crate::track::TrackPoint;

const DEFAULT_WINDOW: usize = 10;
const DEFAULT_LOCAL_HALF_WINDOW: usize = 3;
const DEFAULT_HEADING_THRESHOLD_DEG: f64 = 90.0;
const DEFAULT_SPEED_DROP_FACTOR: f64 = 0.8;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorParams {
    /// Samples compared before and after the candidate index.
    pub window: usize,
    /// Half width of the speed-dip neighbourhood (3 means 7 samples).
    pub local_half_window: usize,
    /// Minimum absolute course change to count as a maneuver.
    pub heading_threshold_deg: f64,
    /// The local minimum speed must fall to this fraction of the track mean.
    pub speed_drop_factor: f64,
}

impl Default for DetectorParams {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            local_half_window: DEFAULT_LOCAL_HALF_WINDOW,
            heading_threshold_deg: DEFAULT_HEADING_THRESHOLD_DEG,
            speed_drop_factor: DEFAULT_SPEED_DROP_FACTOR,
        }
    }
}

/// Scan a uniformly resampled track for course reversals accompanied by a
/// speed dip.
///
/// Every qualifying index produces an event; adjacent triggers from one slow
/// maneuver are not merged.
pub fn detect_events(track: &[TrackPoint], params: &DetectorParams) -> Vec<ManeuverEvent> {
    let n = track.len();
    let w = params.window;
    let mut events = Vec::new();

    let Some(mean_speed) = mean_speed(track) else {
        log::debug!("No speed data in {} points, skipping detection", n);
        return events;
    };
    let speed_limit = params.speed_drop_factor * mean_speed;

    for i in w..n.saturating_sub(w) {
        let (Some(before), Some(after)) = (track[i - w].cog_deg, track[i + w].cog_deg) else {
            continue;
        };
        let change = circular_diff(after, before);
        if change.is_nan() || change.abs() < params.heading_threshold_deg {
            continue;
        }

        let lo = i.saturating_sub(params.local_half_window);
        let hi = (i + params.local_half_window).min(n - 1);
        let Some(local_min) = track[lo..=hi]
            .iter()
            .filter_map(|p| p.sog_mps)
            .filter(|v| v.is_finite())
            .reduce(f64::min)
        else {
            continue;
        };

        if local_min <= speed_limit {
            let kind = if change > 0.0 {
                ManeuverKind::Tack
            } else {
                ManeuverKind::Gybe
            };
            events.push(ManeuverEvent {
                timestamp: track[i].timestamp,
                kind,
                heading_change_deg: change,
            });
        }
    }

    log::debug!("Detected {} maneuver events in {} points", events.len(), n);
    events
}

fn mean_speed(track: &[TrackPoint]) -> Option<f64> {
    let (sum, count) = track
        .iter()
        .filter_map(|p| p.sog_mps)
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    (count > 0).then(|| sum / count as f64)
}
