//! Scatter data and LOWESS curve summaries
//!
//! The smoothing itself is delegated to an external routine behind the
//! [`CurveSmoother`] trait; [`LowessSmoother`] binds it to the `lowess`
//! crate. This module prepares its input (a cancer rate plotted against a
//! risk factor, sorted by the factor) and reduces its output to start, end
//! and change figures.

use ::lowess::prelude::{Batch, Lowess};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::error::{AnalysisError, AnalysisResult};
use crate::models::TimeSeries;

/// Default smoothing fraction of the dashboard slider
pub const DEFAULT_FRACTION: f64 = 0.5;

/// Robustness iterations per fit
pub const DEFAULT_ITERATIONS: usize = 3;

/// External LOWESS implementation
pub trait CurveSmoother {
    /// Smooth `points` (sorted by x) using `fraction` of the data per local fit
    ///
    /// Returns the fitted curve as `(x, y)` pairs in ascending x order.
    fn smooth(&self, points: &[(f64, f64)], fraction: f64) -> AnalysisResult<Vec<(f64, f64)>>;
}

/// Locally weighted linear regression from the `lowess` crate
///
/// Tricube weights with bisquare robustness iterations and no interpolation
/// shortcut, so every input x gets its own local fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LowessSmoother {
    iterations: usize,
}

impl LowessSmoother {
    /// Create a smoother with the default robustness iterations
    #[must_use]
    pub fn new() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
        }
    }

    /// Set the number of robustness iterations (0 disables them)
    #[must_use]
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }
}

impl Default for LowessSmoother {
    fn default() -> Self {
        Self::new()
    }
}

impl CurveSmoother for LowessSmoother {
    fn smooth(&self, points: &[(f64, f64)], fraction: f64) -> AnalysisResult<Vec<(f64, f64)>> {
        if points.is_empty() {
            return Ok(Vec::new());
        }

        let (x, y): (Vec<f64>, Vec<f64>) = points.iter().copied().unzip();
        let fitted = Lowess::new()
            .fraction(fraction)
            .iterations(self.iterations)
            .delta(0.0)
            .adapter(Batch)
            .build()
            .and_then(|model| model.fit(&x, &y))
            .map_err(|e| AnalysisError::Smoothing(e.to_string()))?;

        let curve: Vec<(f64, f64)> = x.iter().copied().zip(fitted.y.iter().copied()).collect();
        if curve.len() != points.len() || curve.iter().any(|(_, y)| !y.is_finite()) {
            return Err(AnalysisError::Smoothing(format!(
                "expected {} finite fitted values",
                points.len()
            )));
        }
        Ok(curve)
    }
}

/// Check that a smoothing fraction lies strictly between 0 and 1
pub fn validate_fraction(fraction: f64) -> AnalysisResult<f64> {
    if fraction > 0.0 && fraction < 1.0 {
        Ok(fraction)
    } else {
        Err(AnalysisError::InvalidFraction(fraction))
    }
}

/// A single scatter point with the year it was observed in
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    /// Observation year
    pub year: i32,

    /// Risk factor value (x axis)
    pub x: f64,

    /// Cancer rate (y axis)
    pub y: f64,
}

/// Pair a cancer series with a risk factor on their common years
///
/// The result is sorted by the factor value, ready for the smoother.
#[must_use]
pub fn scatter_points(cancer: &TimeSeries, factor: &TimeSeries) -> Vec<ScatterPoint> {
    let factor_by_year: BTreeMap<i32, f64> = factor.points().iter().map(|p| (p.year, p.value)).collect();

    let mut points: Vec<ScatterPoint> = cancer
        .points()
        .iter()
        .filter_map(|p| {
            factor_by_year.get(&p.year).map(|&x| ScatterPoint {
                year: p.year,
                x,
                y: p.value,
            })
        })
        .collect();

    points.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));
    points
}

/// Key figures of a smoothed curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LowessSummary {
    /// Fitted value at the first x
    pub start: f64,

    /// Fitted value at the last x
    pub end: f64,

    /// `end - start`
    pub delta: f64,

    /// `delta / start * 100`, `None` when `start` is zero
    pub delta_percent: Option<f64>,
}

impl LowessSummary {
    /// Summarize a smoothed curve given as ordered `(x, y)` pairs
    ///
    /// # Errors
    /// `EmptyCurve` if the curve has no points.
    pub fn from_curve(curve: &[(f64, f64)]) -> AnalysisResult<Self> {
        let (first, last) = match (curve.first(), curve.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err(AnalysisError::EmptyCurve),
        };

        let start = first.1;
        let end = last.1;
        let delta = end - start;
        let delta_percent = if start == 0.0 {
            None
        } else {
            Some(delta / start * 100.0)
        };

        Ok(Self {
            start,
            end,
            delta,
            delta_percent,
        })
    }
}

/// Smooth the scatter of `cancer` against `factor` and summarize the curve
pub fn summarize_relationship<S: CurveSmoother + ?Sized>(
    smoother: &S,
    cancer: &TimeSeries,
    factor: &TimeSeries,
    fraction: f64,
) -> AnalysisResult<(Vec<(f64, f64)>, LowessSummary)> {
    let fraction = validate_fraction(fraction)?;
    let points: Vec<(f64, f64)> = scatter_points(cancer, factor)
        .into_iter()
        .map(|p| (p.x, p.y))
        .collect();

    let curve = smoother.smooth(&points, fraction)?;
    let summary = LowessSummary::from_curve(&curve)?;

    tracing::debug!(
        cancer = %cancer.variable_name(),
        factor = %factor.variable_name(),
        fraction,
        points = points.len(),
        delta = summary.delta,
        "Summarized LOWESS curve"
    );

    Ok((curve, summary))
}
