use serde::{Deserialize, Serialize};

use crate::race::BoatId;
use crate::stats::WindowStatistics;

/// Target minus reference for the headline metrics of one window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub reference_boat: BoatId,
    pub target_boat: BoatId,
    pub delta_vmg: f64,
    pub delta_height: f64,
    pub delta_sog: f64,
}

pub fn compare(
    reference_boat: BoatId,
    reference: &WindowStatistics,
    target_boat: BoatId,
    target: &WindowStatistics,
) -> ComparisonResult {
    ComparisonResult {
        reference_boat,
        target_boat,
        delta_vmg: target.avg_vmg - reference.avg_vmg,
        delta_height: target.height_gain - reference.height_gain,
        delta_sog: target.avg_sog - reference.avg_sog,
    }
}
