//! Angular arithmetic for headings and bearings.
//!
//! Every difference, average or median of a compass quantity in the crate goes
//! through these helpers so wraparound at 0°/360° is never treated linearly.

use std::f64::consts::PI;

/// Wrap an angle into [0, 360).
pub fn normalize_deg(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Signed difference `a - b` wrapped into (-180, 180].
///
/// Returns NaN when either input is NaN.
pub fn circular_diff(a: f64, b: f64) -> f64 {
    let d = (a - b + 540.0).rem_euclid(360.0) - 180.0;
    if d <= -180.0 {
        180.0
    } else {
        d
    }
}

/// Vector-mean summary of a set of headings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircularStats {
    /// Mean direction in [0, 360).
    pub mean_deg: f64,
    /// Dispersion estimate `sqrt(-2 ln R)` expressed in degrees.
    pub std_deg: f64,
    /// Mean resultant length R in [0, 1].
    pub resultant_length: f64,
    pub count: usize,
}

impl CircularStats {
    /// Summarize the given headings, ignoring NaN entries. Returns `None` when
    /// no finite heading is present.
    pub fn from_degrees<I>(headings: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut sin_sum = 0.0;
        let mut cos_sum = 0.0;
        let mut count = 0usize;
        for h in headings.into_iter().filter(|h| h.is_finite()) {
            let r = h.to_radians();
            sin_sum += r.sin();
            cos_sum += r.cos();
            count += 1;
        }
        if count == 0 {
            return None;
        }

        let mean_sin = sin_sum / count as f64;
        let mean_cos = cos_sum / count as f64;
        let resultant_length = mean_sin.hypot(mean_cos).min(1.0);
        let mean_deg = normalize_deg(mean_sin.atan2(mean_cos).to_degrees());
        let std_deg = (-2.0 * resultant_length.ln()).sqrt() * 180.0 / PI;

        Some(Self {
            mean_deg,
            std_deg,
            resultant_length,
            count,
        })
    }
}

/// Median of headings, unwrapped around `center` so samples on either side of
/// north stay adjacent. Even counts average the two middle samples. The result
/// is normalized to [0, 360). `None` when `samples` is empty.
pub fn circular_median(samples: &[f64], center: f64) -> Option<f64> {
    let mut offsets: Vec<f64> = samples
        .iter()
        .filter(|s| s.is_finite())
        .map(|s| circular_diff(*s, center))
        .collect();
    if offsets.is_empty() {
        return None;
    }
    offsets.sort_by(|a, b| a.total_cmp(b));
    let mid = offsets.len() / 2;
    let median = if offsets.len() % 2 == 0 {
        (offsets[mid - 1] + offsets[mid]) / 2.0
    } else {
        offsets[mid]
    };
    Some(normalize_deg(center + median))
}
