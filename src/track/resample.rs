use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::circular::{circular_diff, circular_median};
use crate::geodesy::Geodesy;
use crate::track::{RawFix, TrackError, TrackPoint};

const DEFAULT_STEP_SECONDS: f64 = 1.0;
const DEFAULT_MEDIAN_WINDOW: usize = 5;
const MAX_STEP_SECONDS: f64 = 86_400.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResampleParams {
    /// Grid spacing in seconds.
    pub step_seconds: f64,
    /// Width of the centred course median filter, in samples.
    pub median_window: usize,
}

impl Default for ResampleParams {
    fn default() -> Self {
        Self {
            step_seconds: DEFAULT_STEP_SECONDS,
            median_window: DEFAULT_MEDIAN_WINDOW,
        }
    }
}

impl ResampleParams {
    pub fn step(&self) -> Result<Duration, TrackError> {
        if !self.step_seconds.is_finite() {
            return Err(TrackError::InvalidParameter(format!(
                "resample step must be finite, got {}",
                self.step_seconds
            )));
        }
        if self.step_seconds > MAX_STEP_SECONDS {
            return Err(TrackError::InvalidParameter(format!(
                "resample step must be at most {} s, got {}",
                MAX_STEP_SECONDS, self.step_seconds
            )));
        }
        let millis = (self.step_seconds * 1000.0).round() as i64;
        if millis <= 0 {
            return Err(TrackError::InvalidParameter(format!(
                "resample step must be at least 1 ms, got {} s",
                self.step_seconds
            )));
        }
        Ok(Duration::milliseconds(millis))
    }
}

#[derive(Debug, Clone, Copy)]
struct Sample {
    t: DateTime<Utc>,
    lat: f64,
    lon: f64,
    speed: Option<f64>,
}

/// Resample raw fixes onto a uniform time grid and fill in speed and course.
pub fn resample(
    fixes: &[RawFix],
    geodesy: &Geodesy,
    params: &ResampleParams,
) -> Result<Vec<TrackPoint>, TrackError> {
    let step = params.step()?;
    let samples = prepare_samples(fixes)?;

    let start = samples[0].t;
    let end = samples[samples.len() - 1].t;
    let grid = build_grid(start, end, step);

    let lat_knots: Vec<_> = samples.iter().map(|s| (s.t, s.lat)).collect();
    let lon_knots: Vec<_> = samples
        .iter()
        .map(|s| s.t)
        .zip(unwrap_longitudes(&samples))
        .collect();
    let speed_knots: Vec<_> = samples
        .iter()
        .filter_map(|s| s.speed.map(|v| (s.t, v)))
        .collect();

    let lats = interpolate_series(&lat_knots, &grid);
    let lons = interpolate_series(&lon_knots, &grid);
    let raw_speeds = interpolate_series(&speed_knots, &grid);

    let positions: Vec<(f64, f64)> = lats
        .iter()
        .zip(&lons)
        .map(|(lat, lon)| {
            (
                lat.unwrap_or(f64::NAN),
                circular_diff(lon.unwrap_or(f64::NAN), 0.0),
            )
        })
        .collect();

    let n = grid.len();
    let mut leg_sog: Vec<Option<f64>> = vec![None; n];
    let mut leg_cog: Vec<Option<f64>> = vec![None; n];
    for i in 0..n.saturating_sub(1) {
        let (lat1, lon1) = positions[i];
        let (lat2, lon2) = positions[i + 1];
        let inv = geodesy.inverse(lat1, lon1, lat2, lon2);
        let mut dt = seconds_between(grid[i], grid[i + 1]);
        if dt <= 0.0 {
            dt = 1.0;
        }
        leg_sog[i] = Some(inv.distance_m / dt);
        if inv.distance_m > 0.0 {
            leg_cog[i] = Some(inv.bearing_deg);
        }
    }

    let cog = median_filter(&fill_gaps(&leg_cog), params.median_window);
    let src_rate_hz = 1.0 / seconds_of(step);

    let points: Vec<TrackPoint> = grid
        .iter()
        .enumerate()
        .map(|(i, t)| TrackPoint {
            timestamp: *t,
            latitude_deg: positions[i].0,
            longitude_deg: positions[i].1,
            sog_mps: raw_speeds[i].or(leg_sog[i]),
            cog_deg: cog[i],
            src_rate_hz,
        })
        .collect();

    log::debug!(
        "Resampled {} fixes to {} points between {} and {}",
        samples.len(),
        points.len(),
        start,
        end
    );

    Ok(points)
}

/// Drop fixes without a timestamp, keep the first fix for each timestamp and
/// sort ascending.
fn prepare_samples(fixes: &[RawFix]) -> Result<Vec<Sample>, TrackError> {
    let mut samples: Vec<Sample> = fixes
        .iter()
        .filter_map(|f| {
            f.timestamp.map(|t| Sample {
                t,
                lat: f.latitude_deg,
                lon: f.longitude_deg,
                speed: f.speed_mps.filter(|v| v.is_finite()),
            })
        })
        .collect();

    let untimed = fixes.len() - samples.len();
    if untimed > 0 {
        log::debug!("Discarded {} fixes without timestamp", untimed);
    }
    if samples.is_empty() {
        return Err(TrackError::EmptyTrack);
    }

    // Stable sort keeps arrival order among equal timestamps, so dedup keeps
    // the first occurrence.
    samples.sort_by_key(|s| s.t);
    let before = samples.len();
    samples.dedup_by_key(|s| s.t);
    if samples.len() < before {
        log::debug!("Dropped {} duplicate timestamps", before - samples.len());
    }

    Ok(samples)
}

fn build_grid(start: DateTime<Utc>, end: DateTime<Utc>, step: Duration) -> Vec<DateTime<Utc>> {
    let mut cursor = start;
    let mut grid = Vec::new();

    while cursor <= end {
        grid.push(cursor);
        match cursor.checked_add_signed(step) {
            Some(next) => cursor = next,
            None => break,
        }
    }

    grid
}

/// Longitudes made continuous across the antimeridian so they can be
/// interpolated linearly.
fn unwrap_longitudes(samples: &[Sample]) -> Vec<f64> {
    let mut out = Vec::with_capacity(samples.len());
    let mut prev: Option<(f64, f64)> = None;
    for s in samples {
        let unwrapped = match prev {
            Some((raw, acc)) => acc + circular_diff(s.lon, raw),
            None => s.lon,
        };
        out.push(unwrapped);
        prev = Some((s.lon, unwrapped));
    }
    out
}

/// Time-weighted linear interpolation of `knots` at each grid instant.
/// Instants before the first knot get `None`; instants after the last knot
/// hold the last value.
fn interpolate_series(knots: &[(DateTime<Utc>, f64)], grid: &[DateTime<Utc>]) -> Vec<Option<f64>> {
    let mut j = 0;
    grid.iter()
        .map(|&t| {
            let (first, last) = match (knots.first(), knots.last()) {
                (Some(f), Some(l)) => (f, l),
                _ => return None,
            };
            if t < first.0 {
                return None;
            }
            if t >= last.0 {
                return Some(last.1);
            }
            while j + 1 < knots.len() && knots[j + 1].0 <= t {
                j += 1;
            }
            let (t0, v0) = knots[j];
            match knots.get(j + 1) {
                Some(&(t1, v1)) => {
                    let span = seconds_between(t0, t1);
                    if span <= 0.0 {
                        return Some(v0);
                    }
                    Some(v0 + (v1 - v0) * seconds_between(t0, t) / span)
                }
                None => Some(v0),
            }
        })
        .collect()
}

/// Propagate the next known value backward, then the last known value forward.
fn fill_gaps(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut out = values.to_vec();

    let mut next = None;
    for v in out.iter_mut().rev() {
        match v {
            Some(x) => next = Some(*x),
            None => *v = next,
        }
    }

    let mut prev = None;
    for v in out.iter_mut() {
        match v {
            Some(x) => prev = Some(*x),
            None => *v = prev,
        }
    }

    out
}

/// Centred rolling median over headings; any window holding at least one
/// value yields a value.
fn median_filter(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    let half = window / 2;
    (0..values.len())
        .map(|i| {
            let lo = i.saturating_sub(half);
            let hi = (i + half).min(values.len().saturating_sub(1));
            let slice: Vec<f64> = values[lo..=hi].iter().flatten().copied().collect();
            let center = values[i].or_else(|| slice.first().copied())?;
            circular_median(&slice, center)
        })
        .collect()
}

fn seconds_between(a: DateTime<Utc>, b: DateTime<Utc>) -> f64 {
    seconds_of(b - a)
}

fn seconds_of(d: Duration) -> f64 {
    match d.num_nanoseconds() {
        Some(ns) => ns as f64 / 1e9,
        None => d.num_milliseconds() as f64 / 1000.0,
    }
}
