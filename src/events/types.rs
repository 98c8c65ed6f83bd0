use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ManeuverKind {
    Tack,
    Gybe,
}

/// A detected tack or gybe at one track timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManeuverEvent {
    pub timestamp: DateTime<Utc>,
    pub kind: ManeuverKind,
    /// Signed course change across the detection window, degrees in (-180, 180].
    pub heading_change_deg: f64,
}
