//! Error types for risk assessment

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while encoding inputs or querying a model
#[derive(Debug, Error)]
pub enum ModelError {
    /// Model expects a different feature at this position
    #[error("Feature mismatch at position {position}: model expects '{expected}', input provides '{found}'")]
    FeatureMismatch {
        position: usize,
        expected: String,
        found: String,
    },

    /// Number of weights or names differs from the feature vector length
    #[error("Expected {expected} features, got {found}")]
    FeatureCount { expected: usize, found: usize },

    /// Model artifact could not be read
    #[error("Failed to read model artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Model artifact is not valid JSON of the expected shape
    #[error("Invalid model artifact: {0}")]
    InvalidArtifact(#[from] serde_json::Error),

    /// Model returned something that is not a probability
    #[error("Model returned invalid probability: {0}")]
    InvalidProbability(f64),

    /// Input attribute outside the accepted range
    #[error("Invalid value for {field}: {value} (allowed: {min} to {max})")]
    InvalidInput {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

impl ModelError {
    /// Get localized description for user-facing messages
    pub fn localized_desc(&self) -> String {
        match self {
            Self::FeatureMismatch { .. } | Self::FeatureCount { .. } => format!(
                "{}: {self}",
                crate::i18n::t!("errors.model.feature_mismatch")
            ),
            Self::Io { .. } | Self::InvalidArtifact(_) => format!(
                "{}: {self}",
                crate::i18n::t!("errors.model.invalid_artifact")
            ),
            Self::InvalidProbability(p) => {
                crate::i18n::t!("errors.model.invalid_probability", value = p).to_string()
            }
            Self::InvalidInput {
                field,
                value,
                min,
                max,
            } => crate::i18n::t!(
                "errors.model.invalid_input",
                field = field,
                value = value,
                min = min,
                max = max
            )
            .to_string(),
        }
    }
}
