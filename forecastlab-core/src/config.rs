//! Viewer configuration, read from `forecastlab.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::chart::ChartStyle;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Everything a viewer session can be configured with. Every field has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Dataset opened at startup.
    pub data_path: PathBuf,
    /// Directory for `forecastlab.log`.
    pub log_dir: PathBuf,
    /// Rows shown in the raw-data preview.
    pub preview_rows: usize,
    pub chart: ChartStyle,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(Self::DEFAULT_DATA_PATH),
            log_dir: PathBuf::from("."),
            preview_rows: 500,
            chart: ChartStyle::default(),
        }
    }
}

impl ViewerConfig {
    pub const FILE_NAME: &'static str = "forecastlab.toml";
    pub const DEFAULT_DATA_PATH: &'static str = "Prophet_All_Areas_Forecast.xlsx";

    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let chart = &self.chart;
        for (name, value) in [
            ("chart.band_opacity", chart.band_opacity),
            ("chart.rule_opacity", chart.rule_opacity),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be within 0..=1, got {value}"
                )));
            }
        }
        if chart.dash[0] == 0 {
            return Err(ConfigError::Invalid("chart.dash on-length must be positive".into()));
        }
        if chart.rule_width == 0 {
            return Err(ConfigError::Invalid("chart.rule_width must be positive".into()));
        }
        if self.preview_rows == 0 {
            return Err(ConfigError::Invalid("preview_rows must be positive".into()));
        }
        Ok(())
    }
}
