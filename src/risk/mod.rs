//! Personal cancer-risk assessment
//!
//! Attributes are encoded into a fixed feature vector, scored by a
//! [`RiskModel`] and classified against a probability threshold.

pub mod error;
pub mod features;
pub mod model;

pub use error::ModelError;
pub use features::{
    Education, FamilyStatus, FeatureVector, IncomeBracket, NutritionInput, RiskInput, Sex, FEATURE_COUNT,
    FEATURE_NAMES,
};
pub use model::{LogisticModel, RiskModel};

use serde::{Deserialize, Serialize};

/// Probability at or above which the risk counts as elevated
pub const DEFAULT_THRESHOLD: f64 = 0.40;

/// Disclaimer shown with every result
pub const DISCLAIMER: &str =
    "Dieses Modell dient ausschließlich zu Demonstrationszwecken und ersetzt keine medizinische Diagnose.";

/// Risk classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Elevated,
}

impl RiskLevel {
    /// Classify a probability (`p >= threshold` is elevated)
    #[must_use]
    pub fn classify(probability: f64, threshold: f64) -> Self {
        if probability >= threshold {
            Self::Elevated
        } else {
            Self::Low
        }
    }

    #[must_use]
    pub fn german_label(&self) -> &'static str {
        match self {
            Self::Low => "Niedriges Risiko",
            Self::Elevated => "Erhöhtes Risiko",
        }
    }

    /// Follow-up advice, only for elevated risk
    #[must_use]
    pub fn advice(&self) -> Option<&'static str> {
        match self {
            Self::Low => None,
            Self::Elevated => Some("Bitte ärztliche Beratung in Betracht ziehen."),
        }
    }
}

/// Outcome of one assessment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub probability: f64,
    pub threshold: f64,
    pub level: RiskLevel,
    pub bmi: f64,
}

impl RiskAssessment {
    /// Probability in percent
    #[must_use]
    pub fn percent(&self) -> f64 {
        self.probability * 100.0
    }
}

/// Runs inputs through a model and classifies the result
#[derive(Debug, Clone, Copy)]
pub struct RiskAssessor {
    threshold: f64,
}

impl Default for RiskAssessor {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl RiskAssessor {
    #[must_use]
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Validate, encode and score one input
    pub fn assess<M: RiskModel + ?Sized>(&self, model: &M, input: &RiskInput) -> Result<RiskAssessment, ModelError> {
        input.validate()?;
        let features = input.to_features();
        let probability = model.predict_probability(&features)?;

        if !(0.0..=1.0).contains(&probability) {
            return Err(ModelError::InvalidProbability(probability));
        }

        let level = RiskLevel::classify(probability, self.threshold);
        tracing::info!(
            backend = model.backend_type(),
            probability,
            threshold = self.threshold,
            level = ?level,
            nutrition = input.nutrition.is_some(),
            "Risk assessed"
        );

        Ok(RiskAssessment {
            probability,
            threshold: self.threshold,
            level,
            bmi: input.bmi(),
        })
    }
}
