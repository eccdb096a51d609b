use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{
    BASELINE_THRESHOLD_N, LOADING_PEAK_LIMIT, PROMINENCE_FACTOR, SUSTAIN_SAMPLES,
};
use crate::error::{AnalysisError, Result};

// ---------------------------------------------------------------------------
// AnalysisConfig – filter and detection parameters for one run
// ---------------------------------------------------------------------------

/// Tunable parameters of the analysis. Passed explicitly into every run so
/// independent files never share state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Median window (samples) applied to the continuous modulus.
    pub median_window: usize,
    /// Gaussian sigma (samples) applied after the median pass.
    pub gaussian_sigma: f64,
    /// Median window for the strain-percent curve.
    pub strain_median_window: usize,
    /// Gaussian sigma for the strain-percent curve.
    pub strain_gaussian_sigma: f64,
    /// Load (N) marking the start of the test.
    pub baseline_threshold_n: f64,
    /// Samples a threshold crossing must be held for.
    pub sustain_samples: usize,
    /// Peak prominence as a fraction of the signal's standard deviation.
    pub prominence_factor: f64,
    /// How many force peaks are summarised.
    pub loading_peak_limit: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            median_window: 50,
            gaussian_sigma: 2.0,
            strain_median_window: 1,
            strain_gaussian_sigma: 0.1,
            baseline_threshold_n: BASELINE_THRESHOLD_N,
            sustain_samples: SUSTAIN_SAMPLES,
            prominence_factor: PROMINENCE_FACTOR,
            loading_peak_limit: LOADING_PEAK_LIMIT,
        }
    }
}

impl AnalysisConfig {
    /// Read a JSON config file. Keys that are absent keep their defaults.
    pub fn from_json_path(path: &Path) -> anyhow::Result<Self> {
        use anyhow::Context;

        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: AnalysisConfig = serde_json::from_str(&text).context("parsing config JSON")?;
        config.validate()?;
        Ok(config)
    }

    /// Reject parameter combinations the filters cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.median_window == 0 || self.strain_median_window == 0 {
            return Err(AnalysisError::Data(
                "median window must be at least 1 sample".into(),
            ));
        }
        if !(self.gaussian_sigma > 0.0) || !(self.strain_gaussian_sigma > 0.0) {
            return Err(AnalysisError::Data("gaussian sigma must be positive".into()));
        }
        if self.sustain_samples == 0 {
            return Err(AnalysisError::Data("sustain samples must be at least 1".into()));
        }
        if !(self.prominence_factor >= 0.0) {
            return Err(AnalysisError::Data(
                "prominence factor must be non-negative".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        assert!(AnalysisConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "median_window": 9, "gaussian_sigma": 1.5 }}"#).unwrap();

        let config = AnalysisConfig::from_json_path(file.path()).unwrap();
        assert_eq!(config.median_window, 9);
        assert_eq!(config.gaussian_sigma, 1.5);
        assert_eq!(config.sustain_samples, SUSTAIN_SAMPLES);
        assert_eq!(config.baseline_threshold_n, BASELINE_THRESHOLD_N);
    }

    #[test]
    fn zero_median_window_is_rejected() {
        let config = AnalysisConfig {
            median_window: 0,
            ..AnalysisConfig::default()
        };
        assert!(matches!(config.validate(), Err(AnalysisError::Data(_))));
    }

    #[test]
    fn non_positive_sigma_is_rejected() {
        let config = AnalysisConfig {
            gaussian_sigma: 0.0,
            ..AnalysisConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
