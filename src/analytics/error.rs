//! Error types for the analytics engine

use thiserror::Error;

use crate::models::Dataset;

/// Errors that can occur while fitting or summarizing series
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnalysisError {
    /// Too few observations for a regression
    #[error("Insufficient data for '{variable}': need at least {required} points, got {found}")]
    InsufficientData {
        variable: String,
        required: usize,
        found: usize,
    },

    /// All observations share the same year, the slope is undefined
    #[error("All observations of '{variable}' fall in the same year")]
    DegenerateYears { variable: String },

    /// A smoothed curve without points
    #[error("Smoothed curve is empty")]
    EmptyCurve,

    /// LOWESS smoothing fraction outside (0, 1)
    #[error("Invalid smoothing fraction: {0} (must be between 0 and 1)")]
    InvalidFraction(f64),

    /// Variable not present in any cohort of the selected dataset
    #[error("Unknown variable: {0}")]
    UnknownVariable(String),

    /// Dataset without any variable to preselect
    #[error("Dataset {0} has no variables")]
    NoVariables(Dataset),

    /// The LOWESS backend rejected the scatter
    #[error("LOWESS smoothing failed: {0}")]
    Smoothing(String),

    /// Statistical distribution could not be constructed
    #[error("Distribution error: {0}")]
    Distribution(String),
}

impl AnalysisError {
    /// Check whether the error stems from too little data
    #[must_use]
    pub fn is_insufficient_data(&self) -> bool {
        matches!(self, Self::InsufficientData { .. })
    }

    /// Get localized description for user-facing messages
    pub fn localized_desc(&self) -> String {
        match self {
            Self::InsufficientData {
                variable,
                required,
                found,
            } => crate::i18n::t!(
                "errors.analysis.insufficient_data",
                variable = variable,
                required = required,
                found = found
            )
            .to_string(),
            Self::DegenerateYears { variable } => {
                crate::i18n::t!("errors.analysis.degenerate_years", variable = variable).to_string()
            }
            Self::EmptyCurve => crate::i18n::t!("errors.analysis.empty_curve").to_string(),
            Self::InvalidFraction(fraction) => {
                crate::i18n::t!("errors.analysis.invalid_fraction", fraction = fraction).to_string()
            }
            Self::UnknownVariable(variable) => {
                crate::i18n::t!("errors.analysis.unknown_variable", variable = variable).to_string()
            }
            Self::NoVariables(dataset) => {
                crate::i18n::t!("errors.analysis.no_variables", dataset = dataset.german_label()).to_string()
            }
            Self::Smoothing(msg) => format!("{}: {msg}", crate::i18n::t!("errors.analysis.smoothing")),
            Self::Distribution(msg) => format!(
                "{}: {msg}",
                crate::i18n::t!("errors.analysis.distribution")
            ),
        }
    }
}

/// Result type for analytics operations
pub type AnalysisResult<T> = Result<T, AnalysisError>;
