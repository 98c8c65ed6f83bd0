use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One raw position fix as logged by the device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawFix {
    pub timestamp: Option<DateTime<Utc>>,
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    #[serde(default)]
    pub speed_mps: Option<f64>,
}

impl RawFix {
    pub fn new(timestamp: DateTime<Utc>, latitude_deg: f64, longitude_deg: f64) -> Self {
        Self {
            timestamp: Some(timestamp),
            latitude_deg,
            longitude_deg,
            speed_mps: None,
        }
    }

    pub fn with_speed(mut self, speed_mps: f64) -> Self {
        self.speed_mps = Some(speed_mps);
        self
    }
}

/// A resampled, grid-aligned track sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackPoint {
    pub timestamp: DateTime<Utc>,
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub sog_mps: Option<f64>,
    pub cog_deg: Option<f64>,
    pub src_rate_hz: f64,
}

impl TrackPoint {
    pub fn position(&self) -> (f64, f64) {
        (self.latitude_deg, self.longitude_deg)
    }

    /// Speed over ground, NaN when unknown.
    pub fn sog_or_nan(&self) -> f64 {
        self.sog_mps.unwrap_or(f64::NAN)
    }

    /// Course over ground, NaN when unknown.
    pub fn cog_or_nan(&self) -> f64 {
        self.cog_deg.unwrap_or(f64::NAN)
    }
}
