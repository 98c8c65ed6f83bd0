use std::fs;
use std::io::Cursor;
use std::path::Path;

use chrono::{DateTime, Utc};

use crate::track::{RawFix, TrackError};

/// Read every track point of a GPX document as a raw fix.
///
/// Points without a time are kept with an empty timestamp; the resampler is
/// the one that drops them.
pub fn parse_gpx(input: &[u8], file: &str) -> Result<Vec<RawFix>, TrackError> {
    let malformed = |message: String| TrackError::MalformedInput {
        file: file.to_string(),
        message,
    };

    let mut cursor = Cursor::new(input);
    let document = ::gpx::read(&mut cursor).map_err(|e| malformed(e.to_string()))?;

    let mut fixes = Vec::new();
    let mut untimed = 0usize;

    for track in document.tracks {
        for segment in track.segments {
            for point in segment.points {
                let timestamp = match point.time {
                    Some(time) => {
                        let iso = time.format().map_err(|e| malformed(e.to_string()))?;
                        let utc = DateTime::parse_from_rfc3339(&iso)
                            .map_err(|e| malformed(e.to_string()))?
                            .with_timezone(&Utc);
                        Some(utc)
                    }
                    None => {
                        untimed += 1;
                        None
                    }
                };
                let position = point.point();
                fixes.push(RawFix {
                    timestamp,
                    latitude_deg: position.y(),
                    longitude_deg: position.x(),
                    speed_mps: point.speed,
                });
            }
        }
    }

    if untimed > 0 {
        log::warn!("{}: {} track points have no time", file, untimed);
    }

    Ok(fixes)
}

pub fn read_gpx_file(path: &Path) -> Result<Vec<RawFix>, TrackError> {
    let file = path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();
    let bytes = fs::read(path).map_err(|e| TrackError::MalformedInput {
        file: file.clone(),
        message: e.to_string(),
    })?;
    parse_gpx(&bytes, &file)
}
