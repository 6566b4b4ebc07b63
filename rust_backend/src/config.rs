//! Analysis configuration file support.
//!
//! Settings are read from an `analysis.toml` file and may be overridden by
//! environment variables. Every field has a default matching the layout of the
//! standard Point Survey template and historian export, so an empty file is a
//! valid configuration.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{CheckError, CheckResult};

/// Complete analysis configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub template: TemplateSettings,
    #[serde(default)]
    pub historical: HistoricalSettings,
    #[serde(default)]
    pub quality: QualitySettings,
}

/// Point Survey template settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateSettings {
    /// Metric-name cells containing any of these markers are template scaffolding.
    #[serde(default = "default_exclusion_markers")]
    pub exclusion_markers: Vec<String>,
    /// Text found in auto-generated labels for blank header cells.
    #[serde(default = "default_placeholder_marker")]
    pub placeholder_marker: String,
    /// Point type compared during header reconciliation.
    #[serde(default = "default_analog_point_type")]
    pub analog_point_type: String,
}

/// Historian export settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalSettings {
    #[serde(default = "default_point_name_label")]
    pub point_name_label: String,
    #[serde(default = "default_datetime_label")]
    pub datetime_label: String,
    /// chrono format string for strict timestamp parsing.
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,
    /// Verbose tag prefix removed from display labels.
    #[serde(default = "default_display_prefix")]
    pub display_prefix: String,
    #[serde(default = "default_preview_rows")]
    pub preview_rows: usize,
}

/// Data quality settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualitySettings {
    #[serde(default = "default_window_hours")]
    pub window_hours: u32,
    #[serde(default = "default_samples_per_hour")]
    pub samples_per_hour: u32,
    #[serde(default = "default_freeze_epsilon")]
    pub freeze_epsilon: f64,
    #[serde(default = "default_min_window_hours")]
    pub min_window_hours: u32,
    #[serde(default = "default_max_window_hours")]
    pub max_window_hours: u32,
}

fn default_exclusion_markers() -> Vec<String> {
    vec![
        "Metric Name".to_string(),
        "Add additional metrics as needed".to_string(),
    ]
}

fn default_placeholder_marker() -> String {
    "Unnamed".to_string()
}

fn default_analog_point_type() -> String {
    "Analog".to_string()
}

fn default_point_name_label() -> String {
    "Point Name".to_string()
}

fn default_datetime_label() -> String {
    "Datetime".to_string()
}

fn default_timestamp_format() -> String {
    "%m/%d/%Y %H:%M".to_string()
}

fn default_display_prefix() -> String {
    "VIRTUAL_VIEW.LocalHistorian.".to_string()
}

fn default_preview_rows() -> usize {
    6
}

fn default_window_hours() -> u32 {
    6
}

fn default_samples_per_hour() -> u32 {
    6
}

fn default_freeze_epsilon() -> f64 {
    0.0001
}

fn default_min_window_hours() -> u32 {
    1
}

fn default_max_window_hours() -> u32 {
    240
}

impl Default for TemplateSettings {
    fn default() -> Self {
        Self {
            exclusion_markers: default_exclusion_markers(),
            placeholder_marker: default_placeholder_marker(),
            analog_point_type: default_analog_point_type(),
        }
    }
}

impl Default for HistoricalSettings {
    fn default() -> Self {
        Self {
            point_name_label: default_point_name_label(),
            datetime_label: default_datetime_label(),
            timestamp_format: default_timestamp_format(),
            display_prefix: default_display_prefix(),
            preview_rows: default_preview_rows(),
        }
    }
}

impl Default for QualitySettings {
    fn default() -> Self {
        Self {
            window_hours: default_window_hours(),
            samples_per_hour: default_samples_per_hour(),
            freeze_epsilon: default_freeze_epsilon(),
            min_window_hours: default_min_window_hours(),
            max_window_hours: default_max_window_hours(),
        }
    }
}

impl AnalysisConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> CheckResult<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            CheckError::Configuration(format!("Failed to read config file: {}", e))
        })?;

        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> CheckResult<Self> {
        let config: AnalysisConfig = toml::from_str(content).map_err(|e| {
            CheckError::Configuration(format!("Failed to parse config file: {}", e))
        })?;

        config.validate()?;
        Ok(config)
    }

    fn default_location() -> Option<PathBuf> {
        [
            PathBuf::from("analysis.toml"),
            PathBuf::from("rust_backend/analysis.toml"),
            PathBuf::from("../analysis.toml"),
        ]
        .into_iter()
        .find(|path| path.exists())
    }

    /// Load configuration from the default location.
    ///
    /// Searches for `analysis.toml` in:
    /// 1. Current directory
    /// 2. `rust_backend/` directory
    /// 3. Parent directory
    pub fn from_default_location() -> CheckResult<Self> {
        match Self::default_location() {
            Some(path) => {
                log::debug!("Loading analysis config from {}", path.display());
                Self::from_file(&path)
            }
            None => Err(CheckError::Configuration(
                "No analysis.toml found in standard locations".to_string(),
            )),
        }
    }

    /// Like [`Self::from_default_location`], but built-in defaults when no file exists.
    pub fn load_or_default() -> CheckResult<Self> {
        if Self::default_location().is_some() {
            Self::from_default_location()
        } else {
            log::debug!("No analysis.toml found, using built-in defaults");
            Ok(Self::default())
        }
    }

    /// Apply environment variable overrides.
    ///
    /// # Environment Variables
    /// - `TDT_HIST_WINDOW_HOURS`: default freeze window in hours
    /// - `TDT_HIST_DISPLAY_PREFIX`: tag prefix stripped from display labels
    /// - `TDT_HIST_FREEZE_EPSILON`: rolling std threshold for frozen data
    pub fn with_env_overrides(mut self) -> CheckResult<Self> {
        if let Ok(hours) = env::var("TDT_HIST_WINDOW_HOURS") {
            self.quality.window_hours = hours.trim().parse().map_err(|_| {
                CheckError::Configuration(
                    "TDT_HIST_WINDOW_HOURS must be a whole number of hours".to_string(),
                )
            })?;
        }
        if let Ok(prefix) = env::var("TDT_HIST_DISPLAY_PREFIX") {
            self.historical.display_prefix = prefix;
        }
        if let Ok(epsilon) = env::var("TDT_HIST_FREEZE_EPSILON") {
            self.quality.freeze_epsilon = epsilon.trim().parse().map_err(|_| {
                CheckError::Configuration("TDT_HIST_FREEZE_EPSILON must be a number".to_string())
            })?;
        }

        self.validate()?;
        Ok(self)
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> CheckResult<()> {
        let q = &self.quality;
        if q.min_window_hours == 0 || q.min_window_hours > q.max_window_hours {
            return Err(CheckError::Configuration(format!(
                "Invalid window bounds {}..={}",
                q.min_window_hours, q.max_window_hours
            )));
        }
        if !(q.min_window_hours..=q.max_window_hours).contains(&q.window_hours) {
            return Err(CheckError::Configuration(format!(
                "Default window of {} hours is outside {}..={}",
                q.window_hours, q.min_window_hours, q.max_window_hours
            )));
        }
        if q.samples_per_hour == 0 {
            return Err(CheckError::Configuration(
                "samples_per_hour must be positive".to_string(),
            ));
        }
        if q.freeze_epsilon.is_nan() || q.freeze_epsilon <= 0.0 {
            return Err(CheckError::Configuration(
                "freeze_epsilon must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_equals_default() {
        let config = AnalysisConfig::from_toml_str("").unwrap();
        assert_eq!(config, AnalysisConfig::default());
        assert_eq!(config.quality.window_hours, 6);
        assert_eq!(config.historical.timestamp_format, "%m/%d/%Y %H:%M");
    }

    #[test]
    fn test_partial_override() {
        let config = AnalysisConfig::from_toml_str(
            r#"
            [quality]
            window_hours = 12

            [historical]
            display_prefix = "PLANT."
            "#,
        )
        .unwrap();
        assert_eq!(config.quality.window_hours, 12);
        assert_eq!(config.quality.samples_per_hour, 6);
        assert_eq!(config.historical.display_prefix, "PLANT.");
        assert_eq!(config.template.analog_point_type, "Analog");
    }

    #[test]
    fn test_rejects_window_outside_bounds() {
        let result = AnalysisConfig::from_toml_str("[quality]\nwindow_hours = 500\n");
        assert!(matches!(result, Err(CheckError::Configuration(_))));
    }

    #[test]
    fn test_rejects_non_positive_epsilon() {
        let result = AnalysisConfig::from_toml_str("[quality]\nfreeze_epsilon = 0.0\n");
        assert!(matches!(result, Err(CheckError::Configuration(_))));
    }

    #[test]
    fn test_rejects_nan_epsilon() {
        let result = AnalysisConfig::from_toml_str("[quality]\nfreeze_epsilon = nan\n");
        assert!(matches!(result, Err(CheckError::Configuration(_))));
    }

    #[test]
    fn test_invalid_toml_is_configuration_error() {
        let result = AnalysisConfig::from_toml_str("[quality\n");
        assert!(matches!(result, Err(CheckError::Configuration(_))));
    }
}
