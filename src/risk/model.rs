//! Pluggable risk classifiers

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::error::ModelError;
use super::features::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES};

/// A pre-trained binary classifier
pub trait RiskModel {
    /// Probability of the positive class, within [0, 1]
    fn predict_probability(&self, features: &FeatureVector) -> Result<f64, ModelError>;

    /// Backend identifier used in logs
    fn backend_type(&self) -> &str;
}

/// Logistic regression over the encoded features
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticModel {
    feature_names: Vec<String>,
    weights: Vec<f64>,
    intercept: f64,
}

impl LogisticModel {
    /// Create a model, checking that it matches the feature layout
    pub fn new(feature_names: Vec<String>, weights: Vec<f64>, intercept: f64) -> Result<Self, ModelError> {
        let model = Self {
            feature_names,
            weights,
            intercept,
        };
        model.check_layout()?;
        Ok(model)
    }

    /// Parse a JSON artifact `{feature_names, weights, intercept}`
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        let model: Self = serde_json::from_str(json)?;
        model.check_layout()?;
        Ok(model)
    }

    /// Load a JSON artifact from disk
    pub fn from_file(path: &Path) -> Result<Self, ModelError> {
        let content = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let model = Self::from_json(&content)?;
        tracing::info!(path = %path.display(), "Loaded logistic risk model");
        Ok(model)
    }

    /// Feature weights in feature order
    #[must_use]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Bias term
    #[must_use]
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    fn check_layout(&self) -> Result<(), ModelError> {
        if self.feature_names.len() != FEATURE_COUNT {
            return Err(ModelError::FeatureCount {
                expected: FEATURE_COUNT,
                found: self.feature_names.len(),
            });
        }
        if self.weights.len() != FEATURE_COUNT {
            return Err(ModelError::FeatureCount {
                expected: FEATURE_COUNT,
                found: self.weights.len(),
            });
        }
        if let Some((position, (expected, found))) = self
            .feature_names
            .iter()
            .zip(FEATURE_NAMES.iter())
            .enumerate()
            .find(|(_, (model, input))| model.as_str() != **input)
        {
            return Err(ModelError::FeatureMismatch {
                position,
                expected: expected.clone(),
                found: (*found).to_string(),
            });
        }
        Ok(())
    }
}

impl RiskModel for LogisticModel {
    fn predict_probability(&self, features: &FeatureVector) -> Result<f64, ModelError> {
        let score: f64 = self
            .weights
            .iter()
            .zip(features.as_slice())
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.intercept;

        let probability = 1.0 / (1.0 + (-score).exp());
        if probability.is_finite() {
            Ok(probability)
        } else {
            Err(ModelError::InvalidProbability(probability))
        }
    }

    fn backend_type(&self) -> &str {
        "logistic"
    }
}
