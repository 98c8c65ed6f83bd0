//! Sailing race track analysis: resampling of GPS tracks, tack and gybe
//! detection, and windowed performance statistics against the wind or a mark.

pub mod analysis;
pub mod circular;
pub mod config;
pub mod events;
pub mod geodesy;
pub mod query;
pub mod race;
pub mod stats;
pub mod store;
pub mod track;

pub use analysis::{AnalysisError, Analyzer, IngestSummary, WindowQuery};
pub use config::{AnalysisConfig, ConfigError};
