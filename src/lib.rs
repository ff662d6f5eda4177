//! oncotrend - Cancer trend analysis and interpretation
//!
//! Trend statistics, cohort comparison and correlation analysis for German
//! cancer incidence, mortality and risk-factor time series, plus a personal
//! risk assessment on top of a pre-trained classifier.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`] - Time series, tables, cohorts and datasets
//! - [`data`] - CSV ingestion into an immutable [`data::DataStore`]
//! - [`analytics`] - Trend fitting, cohort comparison, correlation, LOWESS smoothing and summaries
//! - [`dashboard`] - Analysis dispatch over the loaded datasets
//! - [`report`] - Text and JSON rendering
//! - [`risk`] - Feature encoding and risk classification
//! - [`config`] - Configuration management and settings
//!
//! # Example
//!
//! ```no_run
//! use oncotrend::config::Config;
//! use oncotrend::dashboard::Dashboard;
//! use oncotrend::data::DataStore;
//! use oncotrend::models::Dataset;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let store = DataStore::load(&config.data)?;
//!     let dashboard = Dashboard::with_config(&store, &config.analysis);
//!     let report = dashboard.trend(Dataset::Incidence, "Lunge (C33-C34)")?;
//!     println!("{}", report.comparison.narrative);
//!     Ok(())
//! }
//! ```

// Initialize rust-i18n at crate root level
rust_i18n::i18n!("locales", fallback = "de");

pub mod analytics;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod error;
pub mod i18n;
pub mod models;
pub mod report;
pub mod risk;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::analytics::{
        CohortComparator, CohortComparison, CorrelationEngine, CorrelationMatrix, CurveSmoother, LowessSmoother,
        LowessSummary, TrendDirection, TrendFitter, TrendResult,
    };
    pub use crate::config::Config;
    pub use crate::dashboard::{AnalysisMode, AnalysisOutcome, Dashboard, RelationshipReport, Selection, TrendReport};
    pub use crate::data::DataStore;
    pub use crate::error::{Error, ErrorCategory, OncoErrorTrait, Result};
    pub use crate::models::{Cohort, Dataset, SeriesTable, TimeSeries};
    pub use crate::risk::{LogisticModel, RiskAssessor, RiskInput, RiskLevel, RiskModel};
}

// Direct re-exports for convenience
pub use models::{Cohort, Dataset, TimeSeries};
