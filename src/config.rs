use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::events::DetectorParams;
use crate::geodesy::Ellipsoid;
use crate::track::ResampleParams;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Tunables of the analysis pipeline. Every section may be omitted.
///
/// ```yaml
/// geodesy:
///   semi_major_axis_m: 6378137.0
///   flattening: 0.0033528106647474805
/// resample:
///   step_seconds: 1.0
/// detector:
///   heading_threshold_deg: 80.0
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub geodesy: Ellipsoid,
    pub resample: ResampleParams,
    pub detector: DetectorParams,
}

impl AnalysisConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: AnalysisConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.geodesy.is_valid() {
            return Err(ConfigError::Invalid(format!(
                "ellipsoid a={} f={} is not usable",
                self.geodesy.semi_major_axis_m, self.geodesy.flattening
            )));
        }
        self.resample
            .step()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        if self.resample.median_window == 0 {
            return Err(ConfigError::Invalid("resample.median_window must be >= 1".into()));
        }

        let detector = &self.detector;
        if detector.window == 0 {
            return Err(ConfigError::Invalid("detector.window must be >= 1".into()));
        }
        if !(detector.heading_threshold_deg > 0.0 && detector.heading_threshold_deg <= 180.0) {
            return Err(ConfigError::Invalid(format!(
                "detector.heading_threshold_deg must be in (0, 180], got {}",
                detector.heading_threshold_deg
            )));
        }
        if !(detector.speed_drop_factor.is_finite() && detector.speed_drop_factor > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "detector.speed_drop_factor must be positive, got {}",
                detector.speed_drop_factor
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_document_gives_defaults() {
        let config = AnalysisConfig::from_yaml("{}").unwrap();
        assert_eq!(config, AnalysisConfig::default());
        assert_eq!(config.detector.window, 10);
        assert_eq!(config.resample.step_seconds, 1.0);
        assert_eq!(config.geodesy, Ellipsoid::wgs84());
    }

    #[test]
    fn test_partial_sections() {
        let config = AnalysisConfig::from_yaml(
            "detector:\n  heading_threshold_deg: 80.0\nresample:\n  step_seconds: 2.0\n",
        )
        .unwrap();
        assert_eq!(config.detector.heading_threshold_deg, 80.0);
        assert_eq!(config.detector.local_half_window, 3);
        assert_eq!(config.resample.step_seconds, 2.0);
        assert_eq!(config.resample.median_window, 5);
    }

    #[test]
    fn test_partial_geodesy_section() {
        let config = AnalysisConfig::from_yaml("geodesy:\n  semi_major_axis_m: 6378000.0\n").unwrap();
        assert_eq!(config.geodesy.semi_major_axis_m, 6_378_000.0);
        assert_eq!(config.geodesy.flattening, Ellipsoid::wgs84().flattening);
    }

    #[test]
    fn test_step_is_capped_at_one_day() {
        assert!(AnalysisConfig::from_yaml("resample:\n  step_seconds: 86400.0").is_ok());
        for yaml in [
            "resample:\n  step_seconds: 86401.0",
            "resample:\n  step_seconds: 1.0e15",
        ] {
            assert!(
                matches!(AnalysisConfig::from_yaml(yaml), Err(ConfigError::Invalid(_))),
                "{yaml}"
            );
        }
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "detector:\n  window: 8").unwrap();
        let config = AnalysisConfig::from_file(file.path()).unwrap();
        assert_eq!(config.detector.window, 8);

        let missing = file.path().with_extension("missing");
        assert!(matches!(
            AnalysisConfig::from_file(&missing),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn test_rejects_invalid_values() {
        for yaml in [
            "resample:\n  step_seconds: 0.0",
            "resample:\n  step_seconds: -1.0",
            "resample:\n  median_window: 0",
            "detector:\n  window: 0",
            "detector:\n  heading_threshold_deg: 0.0",
            "detector:\n  speed_drop_factor: -0.5",
            "geodesy:\n  semi_major_axis_m: -1.0\n  flattening: 0.003",
        ] {
            assert!(
                matches!(AnalysisConfig::from_yaml(yaml), Err(ConfigError::Invalid(_))),
                "{yaml}"
            );
        }
        assert!(matches!(
            AnalysisConfig::from_yaml("detector: [1, 2"),
            Err(ConfigError::Yaml(_))
        ));
    }
}
