use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::circular::normalize_deg;
use crate::geodesy::Geodesy;
use crate::race::{MarkId, RaceConfig, ReferenceError};
use crate::track::TrackPoint;

/// Where the VMG / height-gain axis comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ReferenceMode {
    /// The race's true wind direction.
    #[default]
    Twd,
    /// Bearing from the window's first point to a course mark.
    Mark,
}

impl FromStr for ReferenceMode {
    type Err = ReferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "twd" => Ok(ReferenceMode::Twd),
            "mark" => Ok(ReferenceMode::Mark),
            other => Err(ReferenceError::UnknownMode(other.to_string())),
        }
    }
}

/// Resolve the reference bearing (degrees in [0, 360)) for a window.
pub fn resolve_reference(
    race: &RaceConfig,
    window: &[TrackPoint],
    mode: ReferenceMode,
    mark_id: Option<MarkId>,
    geodesy: &Geodesy,
) -> Result<f64, ReferenceError> {
    match mode {
        ReferenceMode::Twd => race
            .twd_deg
            .map(normalize_deg)
            .ok_or(ReferenceError::MissingConfiguration),
        ReferenceMode::Mark => {
            let mark = match mark_id {
                Some(id) => race.find_mark(id).ok_or(ReferenceError::InvalidMark(id))?,
                None => race
                    .ordered_marks()
                    .into_iter()
                    .next()
                    .ok_or(ReferenceError::NoMarksDefined)?,
            };
            let first = window.first().ok_or(ReferenceError::EmptyWindow)?;
            let bearing = geodesy.bearing(
                first.latitude_deg,
                first.longitude_deg,
                mark.latitude_deg,
                mark.longitude_deg,
            );
            log::debug!(
                "Reference bearing to mark {} ({}): {:.1} deg",
                mark.id,
                mark.name,
                bearing
            );
            Ok(bearing)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::race::Mark;
    use chrono::{TimeZone, Utc};

    fn race(twd: Option<f64>, marks: Vec<Mark>) -> RaceConfig {
        RaceConfig {
            id: 1,
            name: "Race 1".into(),
            start_time: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
            twd_deg: twd,
            tws_kt: None,
            marks,
        }
    }

    fn mark(id: MarkId, order_idx: i32, lat: f64, lon: f64) -> Mark {
        Mark {
            id,
            name: format!("M{id}"),
            latitude_deg: lat,
            longitude_deg: lon,
            order_idx,
            gate_group: None,
        }
    }

    fn window() -> Vec<TrackPoint> {
        vec![TrackPoint {
            timestamp: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
            latitude_deg: 54.0,
            longitude_deg: 10.0,
            sog_mps: None,
            cog_deg: None,
            src_rate_hz: 1.0,
        }]
    }

    #[test]
    fn test_twd() {
        let g = Geodesy::wgs84();
        let r = race(Some(225.0), vec![]);
        let dir = resolve_reference(&r, &[], ReferenceMode::Twd, None, &g).unwrap();
        assert_eq!(dir, 225.0);

        let r = race(None, vec![]);
        let err = resolve_reference(&r, &window(), ReferenceMode::Twd, None, &g).unwrap_err();
        assert!(matches!(err, ReferenceError::MissingConfiguration));
    }

    #[test]
    fn test_mark_defaults_to_lowest_order() {
        let g = Geodesy::wgs84();
        // order 2 lies due east, order 1 due north
        let r = race(None, vec![mark(7, 2, 54.0, 10.1), mark(8, 1, 54.1, 10.0)]);
        let dir = resolve_reference(&r, &window(), ReferenceMode::Mark, None, &g).unwrap();
        assert!(dir.abs() < 1e-6 || (360.0 - dir) < 1e-6, "{dir}");
    }

    #[test]
    fn test_mark_by_id() {
        let g = Geodesy::wgs84();
        let r = race(None, vec![mark(7, 2, 54.0, 10.1), mark(8, 1, 54.1, 10.0)]);
        let dir = resolve_reference(&r, &window(), ReferenceMode::Mark, Some(7), &g).unwrap();
        let expected = g.bearing(54.0, 10.0, 54.0, 10.1);
        assert!((dir - expected).abs() < 1e-9);
        assert!(dir > 89.0 && dir < 91.0);
    }

    #[test]
    fn test_mark_errors() {
        let g = Geodesy::wgs84();
        let r = race(Some(10.0), vec![mark(7, 1, 54.0, 10.1)]);
        let err = resolve_reference(&r, &window(), ReferenceMode::Mark, Some(99), &g).unwrap_err();
        assert!(matches!(err, ReferenceError::InvalidMark(99)));

        let r = race(Some(10.0), vec![]);
        let err = resolve_reference(&r, &window(), ReferenceMode::Mark, None, &g).unwrap_err();
        assert!(matches!(err, ReferenceError::NoMarksDefined));

        let r = race(None, vec![mark(7, 1, 54.0, 10.1)]);
        let err = resolve_reference(&r, &[], ReferenceMode::Mark, None, &g).unwrap_err();
        assert!(matches!(err, ReferenceError::EmptyWindow));
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!("twd".parse::<ReferenceMode>().unwrap(), ReferenceMode::Twd);
        assert_eq!(" MARK ".parse::<ReferenceMode>().unwrap(), ReferenceMode::Mark);
        assert!(matches!(
            "wind".parse::<ReferenceMode>(),
            Err(ReferenceError::UnknownMode(_))
        ));
        assert_eq!(ReferenceMode::Mark.to_string(), "mark");
    }
}
