//! Tunable analysis parameters.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Severity thresholds for concern detection.
///
/// Spike thresholds are year-over-year percent increases; the others are
/// absolute yearly averages in the metric's unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConcernThresholds {
    pub chlorophyll_spike_pct: f64,
    pub nitrate_spike_pct: f64,
    pub ecoli_spike_pct: f64,
    /// µg/L
    pub chlorophyll_max: f64,
    /// mg/L
    pub nitrate_max: f64,
    /// CFU/100mL
    pub ecoli_max: f64,
}

impl Default for ConcernThresholds {
    fn default() -> Self {
        Self {
            chlorophyll_spike_pct: 50.0,
            nitrate_spike_pct: 40.0,
            ecoli_spike_pct: 100.0,
            chlorophyll_max: 30.0,
            nitrate_max: 10.0,
            ecoli_max: 1000.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub concerns: ConcernThresholds,
    /// First-to-last-year changes within this many percent are stable.
    pub stable_trend_band: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            concerns: ConcernThresholds::default(),
            stable_trend_band: 5.0,
        }
    }
}

impl AnalysisConfig {
    pub fn from_json_str(json: &str) -> Result<AnalysisConfig> {
        serde_json::from_str(json).context("invalid analysis config")
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<AnalysisConfig> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_json_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = AnalysisConfig::from_json_str("{}").unwrap();
        assert_eq!(config, AnalysisConfig::default());
        assert_eq!(config.concerns.chlorophyll_spike_pct, 50.0);
        assert_eq!(config.concerns.ecoli_max, 1000.0);
        assert_eq!(config.stable_trend_band, 5.0);
    }

    #[test]
    fn partial_config_overrides_only_given_fields() {
        let config =
            AnalysisConfig::from_json_str(r#"{ "concerns": { "nitrate_max": 50 } }"#).unwrap();
        assert_eq!(config.concerns.nitrate_max, 50.0);
        assert_eq!(config.concerns.nitrate_spike_pct, 40.0);
    }

    #[test]
    fn malformed_config_is_an_error() {
        assert!(AnalysisConfig::from_json_str("[1, 2]").is_err());
        assert!(AnalysisConfig::from_path("/definitely/not/here.json").is_err());
    }
}
