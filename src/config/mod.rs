//! Configuration management for oncotrend
//!
//! This module handles loading and validating configuration from environment
//! variables and TOML files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::analytics::lowess::DEFAULT_FRACTION;
use crate::models::{Cohort, Dataset, DEFAULT_CANCER_TYPE};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Source table locations
    pub data: DataConfig,

    /// Trend and correlation settings
    pub analysis: AnalysisConfig,

    /// Risk assessment settings
    pub risk: RiskConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Locations of the six source tables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Directory all file names are resolved against
    pub data_dir: PathBuf,

    /// Incidence, women
    pub incidence_female: String,

    /// Incidence, men
    pub incidence_male: String,

    /// Mortality, women
    pub mortality_female: String,

    /// Mortality, men
    pub mortality_male: String,

    /// Risk factors, women
    pub risk_factors_female: String,

    /// Risk factors, men
    pub risk_factors_male: String,
}

impl DataConfig {
    /// Full path of the table for a dataset and cohort
    #[must_use]
    pub fn path(&self, dataset: Dataset, cohort: Cohort) -> PathBuf {
        let file = match (dataset, cohort) {
            (Dataset::Incidence, Cohort::Female) => &self.incidence_female,
            (Dataset::Incidence, Cohort::Male) => &self.incidence_male,
            (Dataset::Mortality, Cohort::Female) => &self.mortality_female,
            (Dataset::Mortality, Cohort::Male) => &self.mortality_male,
            (Dataset::RiskFactors, Cohort::Female) => &self.risk_factors_female,
            (Dataset::RiskFactors, Cohort::Male) => &self.risk_factors_male,
        };
        self.data_dir.join(file)
    }
}

/// Analysis parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Level below which a p-value counts as significant
    pub significance_level: f64,

    /// Fraction of points per local LOWESS fit
    pub lowess_fraction: f64,

    /// Cancer type preselected in the incidence and mortality views
    pub default_variable: String,
}

/// Risk assessment parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskConfig {
    /// Probability at or above which the risk counts as elevated
    pub threshold: f64,

    /// Serialized classifier (JSON)
    pub model_path: Option<PathBuf>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

fn env_f64(key: &str, default: f64) -> f64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<f64>().ok())
        .unwrap_or(default)
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let data_dir = std::env::var("ONCOTREND_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.data.data_dir);

        let significance_level = env_f64(
            "ONCOTREND_SIGNIFICANCE_LEVEL",
            defaults.analysis.significance_level,
        );
        let lowess_fraction = env_f64("ONCOTREND_LOWESS_FRACTION", defaults.analysis.lowess_fraction);
        let threshold = env_f64("ONCOTREND_RISK_THRESHOLD", defaults.risk.threshold);
        let model_path = std::env::var("ONCOTREND_MODEL_PATH").ok().map(PathBuf::from);

        let log_level =
            std::env::var("ONCOTREND_LOG_LEVEL").unwrap_or_else(|_| String::from("info"));
        let log_format =
            std::env::var("ONCOTREND_LOG_FORMAT").unwrap_or_else(|_| String::from("text"));

        Ok(Self {
            data: DataConfig {
                data_dir,
                ..defaults.data
            },
            analysis: AnalysisConfig {
                significance_level,
                lowess_fraction,
                ..defaults.analysis
            },
            risk: RiskConfig {
                threshold,
                model_path,
            },
            logging: LoggingConfig {
                level: log_level,
                format: log_format,
            },
        })
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        let level = self.analysis.significance_level;
        if !(level > 0.0 && level < 1.0) {
            anyhow::bail!("significance_level must be between 0 and 1, got {level}");
        }

        let fraction = self.analysis.lowess_fraction;
        if !(fraction > 0.0 && fraction < 1.0) {
            anyhow::bail!("lowess_fraction must be between 0 and 1, got {fraction}");
        }

        let threshold = self.risk.threshold;
        if !(0.0..=1.0).contains(&threshold) {
            anyhow::bail!("risk threshold must be within [0, 1], got {threshold}");
        }

        if self.analysis.default_variable.trim().is_empty() {
            anyhow::bail!("default_variable must not be empty");
        }

        if !matches!(self.logging.format.as_str(), "text" | "json") {
            anyhow::bail!("log format must be 'text' or 'json'");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data: DataConfig {
                data_dir: PathBuf::from("data"),
                incidence_female: String::from("Krebsdaten_w.csv"),
                incidence_male: String::from("Krebsdaten_m.csv"),
                mortality_female: String::from("Krebsdaten_Mortalität_w.csv"),
                mortality_male: String::from("Krebsdaten_Mortalität_m.csv"),
                risk_factors_female: String::from("risk_factors_w.csv"),
                risk_factors_male: String::from("risk_factors_m.csv"),
            },
            analysis: AnalysisConfig {
                significance_level: 0.05,
                lowess_fraction: DEFAULT_FRACTION,
                default_variable: String::from(DEFAULT_CANCER_TYPE),
            },
            risk: RiskConfig {
                threshold: 0.40,
                model_path: None,
            },
            logging: LoggingConfig {
                level: String::from("info"),
                format: String::from("text"),
            },
        }
    }
}
