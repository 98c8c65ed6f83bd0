use serde::{Deserialize, Serialize};

use crate::circular::{circular_diff, CircularStats};
use crate::events::EventCounts;
use crate::geodesy::Geodesy;
use crate::track::TrackPoint;

/// Aggregate performance figures of one boat over one closed interval.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WindowStatistics {
    pub avg_sog: f64,
    pub avg_vmg: f64,
    pub avg_heading: f64,
    pub heading_std: f64,
    /// Path length in metres.
    pub distance_sailed: f64,
    /// Signed distance made good along the reference bearing, metres.
    pub height_gain: f64,
    pub tack_count: usize,
    pub gybe_count: usize,
}

impl WindowStatistics {
    pub fn with_counts(mut self, counts: EventCounts) -> Self {
        self.tack_count = counts.tacks;
        self.gybe_count = counts.gybes;
        self
    }
}

/// Velocity made good: the component of `sog` along `ref_dir`.
pub fn vmg(sog_mps: f64, cog_deg: f64, ref_dir_deg: f64) -> f64 {
    sog_mps * circular_diff(cog_deg, ref_dir_deg).to_radians().cos()
}

/// Metrics of an already windowed, time-ordered run of points. Event counts
/// are left at zero; see [`WindowStatistics::with_counts`].
pub fn compute_window_statistics(
    points: &[TrackPoint],
    ref_dir_deg: f64,
    geodesy: &Geodesy,
) -> WindowStatistics {
    if points.is_empty() {
        return WindowStatistics::default();
    }

    let avg_sog = nan_mean(points.iter().map(|p| p.sog_or_nan()));
    let avg_vmg = nan_mean(
        points
            .iter()
            .map(|p| vmg(p.sog_or_nan(), p.cog_or_nan(), ref_dir_deg)),
    );
    let (avg_heading, heading_std) = CircularStats::from_degrees(points.iter().map(|p| p.cog_or_nan()))
        .map(|s| (s.mean_deg, s.std_deg))
        .unwrap_or((0.0, 0.0));

    WindowStatistics {
        avg_sog,
        avg_vmg,
        avg_heading,
        heading_std,
        distance_sailed: distance_sailed(points, geodesy),
        height_gain: height_gain(points, ref_dir_deg, geodesy),
        tack_count: 0,
        gybe_count: 0,
    }
}

/// Sum of geodesic lengths of consecutive segments.
pub fn distance_sailed(points: &[TrackPoint], geodesy: &Geodesy) -> f64 {
    points
        .windows(2)
        .map(|pair| {
            geodesy.distance(
                pair[0].latitude_deg,
                pair[0].longitude_deg,
                pair[1].latitude_deg,
                pair[1].longitude_deg,
            )
        })
        .sum()
}

/// Progress along `ref_dir_deg` between the first and last point, measured in
/// the tangent plane at the first point.
pub fn height_gain(points: &[TrackPoint], ref_dir_deg: f64, geodesy: &Geodesy) -> f64 {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return 0.0;
    };
    let (sin_ref, cos_ref) = ref_dir_deg.to_radians().sin_cos();
    let along = |p: &TrackPoint| {
        let (east, north, _up) = geodesy.local_enu(first.position(), p.position());
        east * sin_ref + north * cos_ref
    };
    along(last) - along(first)
}

fn nan_mean<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn straight(geodesy: &Geodesy, bearing: f64, speed: f64, n: usize) -> Vec<TrackPoint> {
        let start = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        (0..n)
            .map(|k| {
                let (lat, lon) = geodesy.destination(54.3, 10.15, bearing, speed * k as f64);
                TrackPoint {
                    timestamp: start + Duration::seconds(k as i64),
                    latitude_deg: lat,
                    longitude_deg: lon,
                    sog_mps: Some(speed),
                    cog_deg: Some(bearing),
                    src_rate_hz: 1.0,
                }
            })
            .collect()
    }

    #[test]
    fn test_vmg_projection() {
        assert!((vmg(5.0, 40.0, 40.0) - 5.0).abs() < 1e-12);
        assert!(vmg(5.0, 130.0, 40.0).abs() < 1e-12);
        assert!(vmg(5.0, 310.0, 40.0).abs() < 1e-12);
        assert!((vmg(5.0, 220.0, 40.0) + 5.0).abs() < 1e-12);
        assert!((vmg(5.0, 5.0, 355.0) - 5.0 * 10f64.to_radians().cos()).abs() < 1e-12);
    }

    #[test]
    fn test_empty_window_is_zero() {
        let g = Geodesy::wgs84();
        assert_eq!(compute_window_statistics(&[], 0.0, &g), WindowStatistics::default());
    }

    #[test]
    fn test_straight_upwind_leg() {
        let g = Geodesy::wgs84();
        let points = straight(&g, 0.0, 4.0, 26);
        let stats = compute_window_statistics(&points, 0.0, &g);

        assert!((stats.avg_sog - 4.0).abs() < 1e-12);
        assert!((stats.avg_vmg - 4.0).abs() < 1e-12);
        assert!(stats.avg_heading < 1e-9 || 360.0 - stats.avg_heading < 1e-9);
        assert!(stats.heading_std < 1e-5);
        assert!((stats.distance_sailed - 100.0).abs() < 1e-6);
        assert!((stats.height_gain - 100.0).abs() < 0.01, "{}", stats.height_gain);
    }

    #[test]
    fn test_height_gain_sign_and_cross_axis() {
        let g = Geodesy::wgs84();
        let points = straight(&g, 0.0, 4.0, 26);
        assert!((height_gain(&points, 180.0, &g) + 100.0).abs() < 0.01);
        assert!(height_gain(&points, 90.0, &g).abs() < 0.01);
        let diag = height_gain(&points, 45.0, &g);
        assert!((diag - 100.0 * 45f64.to_radians().cos()).abs() < 0.01);
    }

    #[test]
    fn test_beam_reach_has_no_vmg() {
        let g = Geodesy::wgs84();
        let points = straight(&g, 90.0, 6.0, 10);
        let stats = compute_window_statistics(&points, 0.0, &g);
        assert!(stats.avg_vmg.abs() < 1e-9);
        assert!((stats.avg_sog - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_missing_values_are_skipped() {
        let g = Geodesy::wgs84();
        let mut points = straight(&g, 0.0, 4.0, 5);
        points[4].sog_mps = None;
        points[3].cog_deg = None;
        let stats = compute_window_statistics(&points, 0.0, &g);
        assert!((stats.avg_sog - 4.0).abs() < 1e-12);
        assert!((stats.avg_vmg - 4.0).abs() < 1e-12);

        for p in points.iter_mut() {
            p.cog_deg = None;
        }
        let stats = compute_window_statistics(&points, 0.0, &g);
        assert_eq!(stats.avg_heading, 0.0);
        assert_eq!(stats.heading_std, 0.0);
        assert_eq!(stats.avg_vmg, 0.0);
    }

    #[test]
    fn test_distance_is_path_not_displacement() {
        let g = Geodesy::wgs84();
        let mut points = straight(&g, 0.0, 10.0, 6);
        let back: Vec<_> = points.iter().rev().skip(1).cloned().collect();
        points.extend(back);
        let stats = compute_window_statistics(&points, 0.0, &g);
        assert!((stats.distance_sailed - 100.0).abs() < 1e-6);
        assert!(stats.height_gain.abs() < 1e-6);
    }

    #[test]
    fn test_with_counts() {
        let stats = WindowStatistics::default().with_counts(EventCounts { tacks: 3, gybes: 1 });
        assert_eq!(stats.tack_count, 3);
        assert_eq!(stats.gybe_count, 1);
    }
}
