use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type RaceId = u32;
pub type MarkId = u32;
pub type BoatId = u32;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mark {
    pub id: MarkId,
    pub name: String,
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub order_idx: i32,
    #[serde(default)]
    pub gate_group: Option<String>,
}

/// Race-level configuration the analysis reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceConfig {
    pub id: RaceId,
    pub name: String,
    pub start_time: DateTime<Utc>,
    /// True wind direction, degrees.
    #[serde(default)]
    pub twd_deg: Option<f64>,
    /// True wind speed, knots.
    #[serde(default)]
    pub tws_kt: Option<f64>,
    #[serde(default)]
    pub marks: Vec<Mark>,
}

impl RaceConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Marks ordered by their course order index.
    pub fn ordered_marks(&self) -> Vec<&Mark> {
        let mut marks: Vec<&Mark> = self.marks.iter().collect();
        marks.sort_by_key(|m| m.order_idx);
        marks
    }

    pub fn find_mark(&self, id: MarkId) -> Option<&Mark> {
        self.marks.iter().find(|m| m.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Boat {
    pub id: BoatId,
    pub race_id: RaceId,
    pub sail_no: String,
    #[serde(default = "default_label_color")]
    pub label_color: String,
}

fn default_label_color() -> String {
    "#1f77b4".to_string()
}
