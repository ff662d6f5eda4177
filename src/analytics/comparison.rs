//! Cohort comparison and automated interpretation
//!
//! Compares the fitted trends of one variable between women and men and
//! assembles the German interpretation text shown below the trend figures.

use serde::{Deserialize, Serialize};

use super::trend::{TrendDirection, TrendResult};
use crate::models::Cohort;

/// Default significance level for the per-cohort test
pub const DEFAULT_SIGNIFICANCE_LEVEL: f64 = 0.05;

/// Relative tolerance under which two slopes count as equally strong
pub const COMPARABLE_RELATIVE_TOLERANCE: f64 = 1e-6;

/// Fitted trend of one cohort with its derived classifications
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CohortTrend {
    /// Cohort the trend belongs to
    pub cohort: Cohort,

    /// Regression result
    pub result: TrendResult,

    /// Direction derived from the slope
    pub direction: TrendDirection,

    /// `p_value < significance_level`
    pub significant: bool,
}

/// Joint pattern of two cohort directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum JointPattern {
    /// Neither cohort shows a trend
    BothStable,

    /// One cohort rises while the other falls
    Divergent { increasing: Cohort },

    /// Both move the same way; `stronger` is `None` when comparable
    SameDirection {
        direction: TrendDirection,
        stronger: Option<Cohort>,
    },

    /// Exactly one cohort is stable
    OneStable { stable: Cohort },
}

/// Structured comparison of one variable across both cohorts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CohortComparison {
    /// Variable under comparison
    pub variable: String,

    /// Trend for women, absent if the variable is not reported for them
    pub female: Option<CohortTrend>,

    /// Trend for men, absent if the variable is not reported for them
    pub male: Option<CohortTrend>,

    /// Joint pattern, only when both cohorts are present
    pub pattern: Option<JointPattern>,

    /// German interpretation text
    pub narrative: String,
}

impl CohortComparison {
    /// Trend of one cohort
    #[must_use]
    pub fn cohort(&self, cohort: Cohort) -> Option<&CohortTrend> {
        match cohort {
            Cohort::Female => self.female.as_ref(),
            Cohort::Male => self.male.as_ref(),
        }
    }
}

/// Builds cohort comparisons and their narrative
#[derive(Debug, Clone, Copy)]
pub struct CohortComparator {
    significance_level: f64,
}

impl Default for CohortComparator {
    fn default() -> Self {
        Self {
            significance_level: DEFAULT_SIGNIFICANCE_LEVEL,
        }
    }
}

impl CohortComparator {
    /// Create a comparator with the default 5% significance level
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different significance level
    #[must_use]
    pub fn with_significance_level(mut self, level: f64) -> Self {
        self.significance_level = level;
        self
    }

    /// Significance level in use
    #[must_use]
    pub fn significance_level(&self) -> f64 {
        self.significance_level
    }

    /// Compare the trends of `variable` for women and men
    ///
    /// Either cohort may be absent. The narrative always covers the
    /// significance of every present cohort (women first); the direction
    /// comparison is only added when both are present.
    #[must_use]
    pub fn compare(
        &self,
        variable: &str,
        female: Option<&TrendResult>,
        male: Option<&TrendResult>,
    ) -> CohortComparison {
        let female = female.map(|r| self.cohort_trend(Cohort::Female, r));
        let male = male.map(|r| self.cohort_trend(Cohort::Male, r));

        let mut narrative = String::new();
        for trend in [&female, &male].into_iter().flatten() {
            narrative.push_str(&significance_sentence(trend));
        }

        let pattern = match (&female, &male) {
            (Some(f), Some(m)) => {
                let pattern = joint_pattern(f, m);
                narrative.push_str(&pattern_sentence(pattern));
                Some(pattern)
            }
            _ => None,
        };

        tracing::debug!(
            variable,
            female = female.is_some(),
            male = male.is_some(),
            pattern = ?pattern,
            "Compared cohort trends"
        );

        CohortComparison {
            variable: variable.to_string(),
            female,
            male,
            pattern,
            narrative,
        }
    }

    fn cohort_trend(&self, cohort: Cohort, result: &TrendResult) -> CohortTrend {
        CohortTrend {
            cohort,
            direction: result.direction(),
            significant: result.is_significant(self.significance_level),
            result: result.clone(),
        }
    }
}

/// `math.isclose(a, b, rel_tol)` with zero absolute tolerance
fn is_close(a: f64, b: f64, rel_tol: f64) -> bool {
    a == b || (a - b).abs() <= rel_tol * a.abs().max(b.abs())
}

fn joint_pattern(female: &CohortTrend, male: &CohortTrend) -> JointPattern {
    use TrendDirection::{Decreasing, Increasing, Stable};

    match (female.direction, male.direction) {
        (Stable, Stable) => JointPattern::BothStable,
        (Increasing, Decreasing) => JointPattern::Divergent {
            increasing: Cohort::Female,
        },
        (Decreasing, Increasing) => JointPattern::Divergent {
            increasing: Cohort::Male,
        },
        (Increasing, Increasing) | (Decreasing, Decreasing) => {
            let f = female.result.slope;
            let m = male.result.slope;
            let stronger = if is_close(f, m, COMPARABLE_RELATIVE_TOLERANCE) {
                None
            } else if f.abs() > m.abs() {
                Some(Cohort::Female)
            } else {
                Some(Cohort::Male)
            };
            JointPattern::SameDirection {
                direction: female.direction,
                stronger,
            }
        }
        (Stable, Increasing | Decreasing) => JointPattern::OneStable {
            stable: Cohort::Female,
        },
        (Increasing | Decreasing, Stable) => JointPattern::OneStable {
            stable: Cohort::Male,
        },
    }
}

fn significance_sentence(trend: &CohortTrend) -> String {
    let negation = if trend.significant { "ein" } else { "kein" };
    format!(
        "Bei {} liegt {negation} statistisch signifikanter Trend vor. ",
        trend.cohort.german_dative()
    )
}

fn other(cohort: Cohort) -> Cohort {
    match cohort {
        Cohort::Female => Cohort::Male,
        Cohort::Male => Cohort::Female,
    }
}

fn pattern_sentence(pattern: JointPattern) -> String {
    match pattern {
        JointPattern::BothStable => {
            "Bei beiden Geschlechtern zeigt sich kein relevanter Trend.".to_string()
        }
        JointPattern::Divergent { increasing } => format!(
            "Bei {} steigt die Fallzahl, während sie bei {} sinkt.",
            increasing.german_dative(),
            other(increasing).german_dative()
        ),
        JointPattern::SameDirection { stronger: None, .. } => {
            "Die Trendstärke ist bei beiden Geschlechtern vergleichbar.".to_string()
        }
        JointPattern::SameDirection {
            direction,
            stronger: Some(cohort),
        } => {
            let noun = if direction == TrendDirection::Increasing {
                "Anstieg"
            } else {
                "Rückgang"
            };
            format!("Der {noun} ist stärker bei {}. ", cohort.german_dative())
        }
        JointPattern::OneStable { stable } => format!(
            "Bei {} zeigt sich kein relevanter Trend, während sich bei {} eine Veränderung zeigt.",
            stable.german_dative(),
            other(stable).german_dative()
        ),
    }
}
