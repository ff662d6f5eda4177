pub mod analysis;
pub mod lowess;
pub mod risk;

// Re-export command functions for convenience
pub use analysis::{correlate, scatter, trend, variables};
pub use self::lowess::lowess;
pub use risk::risk;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use oncotrend::config::Config;
use oncotrend::data::DataStore;
use oncotrend::models::{Cohort, Dataset};

/// Output format of the report commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Load and validate the configuration
///
/// A config file replaces the environment entirely; `--data-dir` overrides both.
pub fn load_config(path: Option<&Path>, data_dir: Option<PathBuf>) -> Result<Config> {
    let mut config = match path {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env()?,
    };

    if let Some(dir) = data_dir {
        config.data.data_dir = dir;
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn load_store(config: &Config) -> Result<DataStore> {
    tracing::info!(
        "{}",
        oncotrend::i18n::t!("cli.loading", dir = config.data.data_dir.display().to_string())
    );
    DataStore::load(&config.data).context("Failed to load datasets")
}

fn parse_dataset(value: &str) -> Result<Dataset> {
    Dataset::parse(value).with_context(|| {
        format!("Unknown dataset '{value}' (expected incidence, mortality or risk_factors)")
    })
}

fn parse_cancer_dataset(value: &str) -> Result<Dataset> {
    match parse_dataset(value)? {
        Dataset::RiskFactors => anyhow::bail!("'{value}' is not a cancer dataset (expected incidence or mortality)"),
        dataset => Ok(dataset),
    }
}

fn parse_cohort(value: &str) -> Result<Cohort> {
    Cohort::parse(value).with_context(|| format!("Unknown cohort '{value}' (expected w or m)"))
}
