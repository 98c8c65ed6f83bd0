//! Upload processing and window queries over a track store.

use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{AnalysisConfig, ConfigError};
use crate::events::{detect_events, EventCounts, EventFilter, ManeuverEvent};
use crate::geodesy::Geodesy;
use crate::race::{resolve_reference, BoatId, MarkId, ReferenceError, ReferenceMode};
use crate::stats::{compare, compute_window_statistics, ComparisonResult, WindowStatistics};
use crate::store::{RaceProvider, StoreError, TrackStore};
use crate::track::{resample, RawFix, TrackError, TrackPoint};

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("track error: {0}")]
    Track(#[from] TrackError),
    #[error("reference error: {0}")]
    Reference(#[from] ReferenceError),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Interval and reference selection for a statistics query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowQuery {
    pub t0: DateTime<Utc>,
    pub t1: DateTime<Utc>,
    #[serde(default)]
    pub mode: ReferenceMode,
    #[serde(default)]
    pub mark_id: Option<MarkId>,
}

impl WindowQuery {
    pub fn new(t0: DateTime<Utc>, t1: DateTime<Utc>) -> Self {
        Self {
            t0,
            t1,
            mode: ReferenceMode::Twd,
            mark_id: None,
        }
    }

    pub fn with_mark(mut self, mark_id: Option<MarkId>) -> Self {
        self.mode = ReferenceMode::Mark;
        self.mark_id = mark_id;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestSummary {
    pub boat: BoatId,
    pub points: usize,
    pub events: usize,
}

pub struct Analyzer {
    config: AnalysisConfig,
    geodesy: Geodesy,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(AnalysisConfig::default())
    }
}

impl Analyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        let geodesy = Geodesy::new(config.geodesy);
        Self { config, geodesy }
    }

    /// Validate the configuration before building the analyzer.
    pub fn try_new(config: AnalysisConfig) -> Result<Self, AnalysisError> {
        config.validate()?;
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn geodesy(&self) -> &Geodesy {
        &self.geodesy
    }

    /// Resample raw fixes and detect maneuvers on the result.
    pub fn process_fixes(
        &self,
        fixes: &[RawFix],
    ) -> Result<(Vec<TrackPoint>, Vec<ManeuverEvent>), TrackError> {
        let points = resample(fixes, &self.geodesy, &self.config.resample)?;
        let events = detect_events(&points, &self.config.detector);
        Ok((points, events))
    }

    /// Rebuild the stored track and events of a boat from its raw fixes.
    pub fn ingest<S>(&self, store: &mut S, boat: BoatId) -> Result<IngestSummary, AnalysisError>
    where
        S: TrackStore,
    {
        let fixes = store.raw_fixes(boat)?;
        let (points, events) = self.process_fixes(&fixes)?;
        let summary = IngestSummary {
            boat,
            points: points.len(),
            events: events.len(),
        };

        store.write_points(boat, points)?;
        store.replace_events(boat, events)?;
        info!(
            "Boat {}: {} fixes resampled to {} points, {} maneuvers",
            boat,
            fixes.len(),
            summary.points,
            summary.events
        );
        Ok(summary)
    }

    /// Statistics of one boat over `[t0, t1]`.
    pub fn window_statistics<S>(
        &self,
        store: &S,
        boat: BoatId,
        query: &WindowQuery,
    ) -> Result<WindowStatistics, AnalysisError>
    where
        S: TrackStore + RaceProvider,
    {
        let race = store.race_for_boat(boat)?;
        let points = store.points(boat, query.t0, query.t1)?;
        if points.is_empty() {
            debug!(
                "Boat {}: no points between {} and {}",
                boat, query.t0, query.t1
            );
            return Ok(WindowStatistics::default());
        }

        let ref_dir = resolve_reference(&race, &points, query.mode, query.mark_id, &self.geodesy)?;
        let events = store.events(boat, &EventFilter::between(query.t0, query.t1))?;
        let counts = EventCounts::tally(&events, query.t0, query.t1);

        Ok(compute_window_statistics(&points, ref_dir, &self.geodesy).with_counts(counts))
    }

    /// Compare `target` against `reference` over the same window.
    pub fn compare_boats<S>(
        &self,
        store: &S,
        reference: BoatId,
        target: BoatId,
        query: &WindowQuery,
    ) -> Result<ComparisonResult, AnalysisError>
    where
        S: TrackStore + RaceProvider,
    {
        let reference_stats = self.window_statistics(store, reference, query)?;
        let target_stats = self.window_statistics(store, target, query)?;
        Ok(compare(reference, &reference_stats, target, &target_stats))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::race::{Boat, RaceConfig};
    use crate::store::MemoryStore;
    use chrono::{Duration, TimeZone};

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn store_with_boat(twd: Option<f64>) -> MemoryStore {
        let mut store = MemoryStore::new();
        store.insert_race(RaceConfig {
            id: 1,
            name: "Race 1".into(),
            start_time: start(),
            twd_deg: twd,
            tws_kt: Some(12.0),
            marks: vec![],
        });
        store
            .insert_boat(Boat {
                id: 5,
                race_id: 1,
                sail_no: "GER 5".into(),
                label_color: "#d62728".into(),
            })
            .unwrap();
        store
    }

    fn northbound_fixes(geodesy: &Geodesy, seconds: i64) -> Vec<RawFix> {
        (0..=seconds)
            .step_by(5)
            .map(|k| {
                let (lat, lon) = geodesy.destination(54.3, 10.15, 0.0, 3.0 * k as f64);
                RawFix::new(start() + Duration::seconds(k), lat, lon)
            })
            .collect()
    }

    #[test]
    fn test_ingest_then_query() {
        let analyzer = Analyzer::default();
        let mut store = store_with_boat(Some(0.0));
        store
            .append_raw_fixes(5, northbound_fixes(analyzer.geodesy(), 60))
            .unwrap();

        let summary = analyzer.ingest(&mut store, 5).unwrap();
        assert_eq!(summary.points, 61);
        assert_eq!(summary.events, 0);

        let query = WindowQuery::new(start(), start() + Duration::seconds(60));
        let stats = analyzer.window_statistics(&store, 5, &query).unwrap();
        assert!((stats.avg_sog - 3.0).abs() < 0.05, "{}", stats.avg_sog);
        assert!((stats.avg_vmg - 3.0).abs() < 0.05);
        assert!((stats.height_gain - 180.0).abs() < 0.5);
        assert_eq!(stats.tack_count, 0);
    }

    #[test]
    fn test_empty_window_skips_reference() {
        let analyzer = Analyzer::default();
        let mut store = store_with_boat(None);
        store
            .append_raw_fixes(5, northbound_fixes(analyzer.geodesy(), 20))
            .unwrap();
        analyzer.ingest(&mut store, 5).unwrap();

        let later = start() + Duration::hours(1);
        let query = WindowQuery::new(later, later + Duration::seconds(10));
        let stats = analyzer.window_statistics(&store, 5, &query).unwrap();
        assert_eq!(stats, WindowStatistics::default());

        let query = WindowQuery::new(start(), start() + Duration::seconds(10));
        assert!(matches!(
            analyzer.window_statistics(&store, 5, &query),
            Err(AnalysisError::Reference(ReferenceError::MissingConfiguration))
        ));
    }

    #[test]
    fn test_ingest_without_fixes() {
        let analyzer = Analyzer::default();
        let mut store = store_with_boat(Some(0.0));
        assert!(matches!(
            analyzer.ingest(&mut store, 5),
            Err(AnalysisError::Track(TrackError::EmptyTrack))
        ));
        assert!(matches!(
            analyzer.ingest(&mut store, 6),
            Err(AnalysisError::Store(StoreError::BoatNotFound(6)))
        ));
    }

    #[test]
    fn test_try_new_validates() {
        let mut config = AnalysisConfig::default();
        config.detector.window = 0;
        assert!(matches!(
            Analyzer::try_new(config),
            Err(AnalysisError::Config(ConfigError::Invalid(_)))
        ));
    }
}
