//! Linear trend fitting and direction classification
//!
//! This module provides functionality for:
//! - Fitting an ordinary-least-squares line of value on year
//! - Two-sided significance test and 95% confidence interval of the slope
//! - Decade-normalized percent change relative to the first observation
//! - Classifying the slope as stable, increasing or decreasing

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};

use super::error::{AnalysisError, AnalysisResult};
use crate::models::TimeSeries;

/// Absolute slope tolerance below which a trend counts as stable
pub const STABLE_TOLERANCE: f64 = 1e-9;

/// Minimum number of observations for a regression
pub const MIN_POINTS: usize = 2;

/// Qualitative direction of a fitted slope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrendDirection {
    /// `|slope| <= 1e-9`
    Stable,

    /// `slope > 1e-9`
    Increasing,

    /// `slope < -1e-9`
    Decreasing,
}

impl TrendDirection {
    /// Determine trend direction from a slope
    ///
    /// # Classification
    /// - `|slope| <= 1e-9`: Stable
    /// - `slope > 1e-9`: Increasing
    /// - `slope < -1e-9`: Decreasing
    ///
    /// The tolerance is fixed. Short noisy series almost never produce a
    /// slope this close to zero.
    #[must_use]
    pub fn classify(slope: f64) -> Self {
        if slope.abs() <= STABLE_TOLERANCE {
            Self::Stable
        } else if slope > 0.0 {
            Self::Increasing
        } else {
            Self::Decreasing
        }
    }

    /// German label ("stabil", "steigend", "fallend")
    #[must_use]
    pub fn german_label(&self) -> &'static str {
        match self {
            Self::Stable => "stabil",
            Self::Increasing => "steigend",
            Self::Decreasing => "fallend",
        }
    }

    /// Check if the direction is stable
    #[must_use]
    pub fn is_stable(&self) -> bool {
        matches!(self, Self::Stable)
    }
}

/// Result of fitting a linear trend to one series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendResult {
    /// Variable the trend was fitted for
    pub variable: String,

    /// Change in value units per year
    pub slope: f64,

    /// Fitted value at year zero
    pub intercept: f64,

    /// Two-sided p-value for `slope == 0` (NaN with only two points)
    pub p_value: f64,

    /// 95% confidence interval of the slope `(lower, upper)`
    pub confidence_interval: (f64, f64),

    /// Value at the earliest year of the series
    pub baseline: f64,

    /// `slope * 10 / baseline * 100`, `None` when the baseline is zero
    pub percent_change_per_decade: Option<f64>,

    /// Number of observations used
    pub n_points: usize,
}

impl TrendResult {
    /// Qualitative direction of the slope
    #[must_use]
    pub fn direction(&self) -> TrendDirection {
        TrendDirection::classify(self.slope)
    }

    /// Check significance at the given level (`p < level`)
    ///
    /// An undefined p-value is never significant.
    #[must_use]
    pub fn is_significant(&self, level: f64) -> bool {
        self.p_value < level
    }

    /// Residual degrees of freedom
    #[must_use]
    pub fn degrees_of_freedom(&self) -> usize {
        self.n_points.saturating_sub(2)
    }

    /// Check whether p-value and confidence interval are defined
    #[must_use]
    pub fn has_inference(&self) -> bool {
        self.degrees_of_freedom() > 0
    }

    /// Fitted value for a year
    #[must_use]
    pub fn predict(&self, year: i32) -> f64 {
        self.intercept + self.slope * f64::from(year)
    }
}

/// Percent change over ten years implied by `slope`, relative to `baseline`
#[must_use]
pub fn decade_percent_change(slope: f64, baseline: f64) -> Option<f64> {
    if baseline == 0.0 {
        None
    } else {
        Some((slope * 10.0 / baseline) * 100.0)
    }
}

/// Ordinary-least-squares trend fitter
#[derive(Debug, Clone, Copy)]
pub struct TrendFitter {
    confidence_level: f64,
}

impl Default for TrendFitter {
    fn default() -> Self {
        Self {
            confidence_level: 0.95,
        }
    }
}

impl TrendFitter {
    /// Create a fitter with the default 95% confidence level
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Confidence level of the reported slope interval
    #[must_use]
    pub fn confidence_level(&self) -> f64 {
        self.confidence_level
    }

    /// Fit `value = intercept + slope * year` to a series
    ///
    /// # Errors
    /// - `InsufficientData` for fewer than two observations
    /// - `DegenerateYears` if every observation has the same year
    pub fn fit(&self, series: &TimeSeries) -> AnalysisResult<TrendResult> {
        let n = series.len();
        if n < MIN_POINTS {
            return Err(AnalysisError::InsufficientData {
                variable: series.variable_name().to_string(),
                required: MIN_POINTS,
                found: n,
            });
        }

        let points: Vec<(f64, f64)> = series
            .points()
            .iter()
            .map(|p| (f64::from(p.year), p.value))
            .collect();

        let n_f64 = n as f64;
        let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / n_f64;
        let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / n_f64;

        let sxx: f64 = points.iter().map(|(x, _)| (x - mean_x).powi(2)).sum();
        let sxy: f64 = points
            .iter()
            .map(|(x, y)| (x - mean_x) * (y - mean_y))
            .sum();

        if sxx == 0.0 {
            return Err(AnalysisError::DegenerateYears {
                variable: series.variable_name().to_string(),
            });
        }

        let slope = sxy / sxx;
        let intercept = mean_y - slope * mean_x;

        let (p_value, confidence_interval) = if n > MIN_POINTS {
            let df = (n - 2) as f64;
            let sse: f64 = points
                .iter()
                .map(|(x, y)| (y - (intercept + slope * x)).powi(2))
                .sum();
            let std_error = (sse / df / sxx).sqrt();
            self.inference(slope, std_error, df)?
        } else {
            (f64::NAN, (f64::NAN, f64::NAN))
        };

        // Baseline is the first observation, not the fitted value
        let baseline = series.first().map_or(f64::NAN, |p| p.value);
        let percent_change_per_decade = decade_percent_change(slope, baseline);

        tracing::debug!(
            variable = %series.variable_name(),
            n_points = n,
            slope,
            p_value,
            baseline,
            "Fitted linear trend"
        );

        Ok(TrendResult {
            variable: series.variable_name().to_string(),
            slope,
            intercept,
            p_value,
            confidence_interval,
            baseline,
            percent_change_per_decade,
            n_points: n,
        })
    }

    /// p-value and confidence interval of a slope estimate
    fn inference(&self, slope: f64, std_error: f64, df: f64) -> AnalysisResult<(f64, (f64, f64))> {
        let dist = StudentsT::new(0.0, 1.0, df)
            .map_err(|e| AnalysisError::Distribution(e.to_string()))?;

        // Exact fit: no residual variance left
        if std_error == 0.0 {
            let p_value = if slope == 0.0 { 1.0 } else { 0.0 };
            return Ok((p_value, (slope, slope)));
        }

        let t_stat = slope / std_error;
        let p_value = (2.0 * (1.0 - dist.cdf(t_stat.abs()))).clamp(0.0, 1.0);

        let alpha = 1.0 - self.confidence_level;
        let t_crit = dist.inverse_cdf(1.0 - alpha / 2.0);
        let margin = t_crit * std_error;

        Ok((p_value, (slope - margin, slope + margin)))
    }
}
