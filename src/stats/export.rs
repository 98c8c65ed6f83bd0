use std::io::Write;

use crate::race::BoatId;
use crate::stats::WindowStatistics;

const HEADER: [&str; 9] = [
    "boat_id",
    "avg_sog_mps",
    "avg_vmg_mps",
    "avg_heading_deg",
    "heading_std_deg",
    "distance_sailed_m",
    "height_gain_m",
    "tack_count",
    "gybe_count",
];

/// Write one CSV row per boat, preceded by a header row.
pub fn write_statistics_csv<W: Write>(
    rows: &[(BoatId, WindowStatistics)],
    writer: &mut csv::Writer<W>,
) -> Result<(), csv::Error> {
    writer.write_record(HEADER)?;
    for (boat, stats) in rows {
        writer.write_record([
            boat.to_string(),
            format!("{:.3}", stats.avg_sog),
            format!("{:.3}", stats.avg_vmg),
            format!("{:.1}", stats.avg_heading),
            format!("{:.1}", stats.heading_std),
            format!("{:.1}", stats.distance_sailed),
            format!("{:.1}", stats.height_gain),
            stats.tack_count.to_string(),
            stats.gybe_count.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
