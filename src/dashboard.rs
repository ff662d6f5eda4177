//! Analysis dispatch over the loaded datasets
//!
//! One parameterized pipeline serves incidence, mortality and risk factors:
//! fit both cohorts, compare them, and hand the result to the report layer.
//! [`Dashboard::run`] maps a selected [`AnalysisMode`] to its engine call.

use serde::{Deserialize, Serialize};

use crate::analytics::lowess::{
    scatter_points, summarize_relationship, CurveSmoother, LowessSmoother, LowessSummary, ScatterPoint,
    DEFAULT_FRACTION,
};
use crate::analytics::{
    AnalysisError, AnalysisResult, CohortComparator, CohortComparison, CorrelationEngine, CorrelationMatrix,
    TrendFitter, TrendResult,
};
use crate::config::AnalysisConfig;
use crate::data::DataStore;
use crate::models::{Cohort, Dataset, TimeSeries, DEFAULT_CANCER_TYPE};

/// Selected analysis area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMode {
    /// Trend analysis of one dataset
    Trend(Dataset),

    /// Correlation of a cancer dataset with the risk factors ("Zusammenhang")
    Correlation(Dataset),
}

impl AnalysisMode {
    /// German page name
    #[must_use]
    pub fn german_label(&self) -> &'static str {
        match self {
            Self::Trend(dataset) => dataset.german_label(),
            Self::Correlation(_) => "Zusammenhang",
        }
    }
}

/// Variables and cohorts a dispatched analysis runs on
///
/// Trend modes read `variable` and `all`, correlation reads `cohort`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// Variable to analyze, the dataset's preselection if `None`
    pub variable: Option<String>,

    /// Analyze every variable of the dataset
    pub all: bool,

    /// Restrict to one cohort, both if `None`
    pub cohort: Option<Cohort>,
}

impl Selection {
    /// Select a single variable
    #[must_use]
    pub fn variable(variable: impl Into<String>) -> Self {
        Self {
            variable: Some(variable.into()),
            ..Self::default()
        }
    }

    /// Select every variable
    #[must_use]
    pub fn all() -> Self {
        Self {
            all: true,
            ..Self::default()
        }
    }

    /// Select one cohort
    #[must_use]
    pub fn cohort(cohort: Cohort) -> Self {
        Self {
            cohort: Some(cohort),
            ..Self::default()
        }
    }
}

/// Result of a dispatched analysis
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    /// Trend report or failure per analyzed variable
    Trend(Vec<(String, AnalysisResult<TrendReport>)>),

    /// Correlation matrix per cohort
    Correlation(Vec<(Cohort, CorrelationMatrix)>),
}

/// Trend analysis of one variable across both cohorts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendReport {
    /// Dataset the variable belongs to
    pub dataset: Dataset,

    /// Analyzed variable
    pub variable: String,

    /// Y-axis title for charts of this variable
    pub axis_title: String,

    /// Line-chart data per reporting cohort
    pub series: Vec<(Cohort, TimeSeries)>,

    /// Per-cohort trends and interpretation
    pub comparison: CohortComparison,
}

impl TrendReport {
    /// Trend result of one cohort, if present
    #[must_use]
    pub fn result(&self, cohort: Cohort) -> Option<&TrendResult> {
        self.comparison.cohort(cohort).map(|t| &t.result)
    }
}

/// Scatter, smoothed curve and key figures of a cancer type against a risk factor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipReport {
    pub cohort: Cohort,
    pub cancer: String,
    pub factor: String,
    pub fraction: f64,
    pub points: Vec<ScatterPoint>,
    pub curve: Vec<(f64, f64)>,
    pub summary: LowessSummary,
}

/// Engine entry point bound to a loaded data store
#[derive(Debug, Clone)]
pub struct Dashboard<'a> {
    store: &'a DataStore,
    fitter: TrendFitter,
    comparator: CohortComparator,
    correlation: CorrelationEngine,
    default_cancer_type: String,
    lowess_fraction: f64,
}

impl<'a> Dashboard<'a> {
    /// Create a dashboard with the default analysis settings
    #[must_use]
    pub fn new(store: &'a DataStore) -> Self {
        Self {
            store,
            fitter: TrendFitter::new(),
            comparator: CohortComparator::new(),
            correlation: CorrelationEngine::new(),
            default_cancer_type: DEFAULT_CANCER_TYPE.to_string(),
            lowess_fraction: DEFAULT_FRACTION,
        }
    }

    /// Create a dashboard using configured analysis settings
    #[must_use]
    pub fn with_config(store: &'a DataStore, config: &AnalysisConfig) -> Self {
        Self {
            comparator: CohortComparator::new().with_significance_level(config.significance_level),
            default_cancer_type: config.default_variable.clone(),
            lowess_fraction: config.lowess_fraction,
            ..Self::new(store)
        }
    }

    /// Run the engine call of a selected analysis area
    ///
    /// # Errors
    /// `NoVariables` if a trend is requested without a variable on a dataset
    /// that has none. Per-variable failures are part of the outcome.
    pub fn run(&self, mode: AnalysisMode, selection: &Selection) -> AnalysisResult<AnalysisOutcome> {
        tracing::debug!(mode = mode.german_label(), ?selection, "Dispatching analysis");

        match mode {
            AnalysisMode::Trend(dataset) if selection.all => Ok(AnalysisOutcome::Trend(self.trend_all(dataset))),
            AnalysisMode::Trend(dataset) => {
                let variable = selection
                    .variable
                    .clone()
                    .or_else(|| self.default_variable(dataset))
                    .ok_or(AnalysisError::NoVariables(dataset))?;
                let report = self.trend(dataset, &variable);
                Ok(AnalysisOutcome::Trend(vec![(variable, report)]))
            }
            AnalysisMode::Correlation(primary) => {
                let cohorts = match selection.cohort {
                    Some(cohort) => vec![cohort],
                    None => Cohort::all().to_vec(),
                };
                let matrices = cohorts
                    .into_iter()
                    .map(|cohort| (cohort, self.correlation(primary, cohort)))
                    .collect();
                Ok(AnalysisOutcome::Correlation(matrices))
            }
        }
    }

    /// Sorted union of the variables of a dataset over both cohorts
    #[must_use]
    pub fn variables(&self, dataset: Dataset) -> Vec<String> {
        self.store.tables(dataset).variables()
    }

    /// Variable preselected for a dataset
    ///
    /// The configured cancer type for incidence and mortality if present,
    /// else the first variable.
    #[must_use]
    pub fn default_variable(&self, dataset: Dataset) -> Option<String> {
        let variables = self.variables(dataset);
        dataset
            .default_variable()
            .map(|_| self.default_cancer_type.as_str())
            .filter(|v| variables.iter().any(|x| x == v))
            .map(str::to_string)
            .or_else(|| variables.into_iter().next())
    }

    /// Line-chart data: the variable's series per cohort that reports it
    #[must_use]
    pub fn chart_series(&self, dataset: Dataset, variable: &str) -> Vec<(Cohort, &'a TimeSeries)> {
        Cohort::all()
            .into_iter()
            .filter_map(|cohort| {
                self.store
                    .table(dataset, cohort)
                    .get(variable)
                    .map(|series| (cohort, series))
            })
            .collect()
    }

    /// Fit, compare and interpret the trend of `variable`
    ///
    /// # Errors
    /// - `UnknownVariable` if neither cohort reports the variable
    /// - `InsufficientData` if a reporting cohort has fewer than two points
    pub fn trend(&self, dataset: Dataset, variable: &str) -> AnalysisResult<TrendReport> {
        let tables = self.store.tables(dataset);
        let fit = |cohort: Cohort| -> AnalysisResult<Option<TrendResult>> {
            tables
                .get(cohort)
                .get(variable)
                .map(|series| self.fitter.fit(series))
                .transpose()
        };

        let female = fit(Cohort::Female)?;
        let male = fit(Cohort::Male)?;

        if female.is_none() && male.is_none() {
            return Err(AnalysisError::UnknownVariable(variable.to_string()));
        }

        let comparison = self
            .comparator
            .compare(variable, female.as_ref(), male.as_ref());

        tracing::info!(
            dataset = %dataset,
            variable,
            pattern = ?comparison.pattern,
            "Trend analysis completed"
        );

        let series = self
            .chart_series(dataset, variable)
            .into_iter()
            .map(|(cohort, series)| (cohort, series.clone()))
            .collect();

        Ok(TrendReport {
            dataset,
            variable: variable.to_string(),
            axis_title: dataset.axis_title(variable).to_string(),
            series,
            comparison,
        })
    }

    /// Trend reports for every variable of a dataset
    ///
    /// Variables whose fit fails are returned with their error.
    #[must_use]
    pub fn trend_all(&self, dataset: Dataset) -> Vec<(String, AnalysisResult<TrendReport>)> {
        self.variables(dataset)
            .into_iter()
            .map(|variable| {
                let report = self.trend(dataset, &variable);
                if let Err(e) = &report {
                    tracing::warn!(dataset = %dataset, variable = %variable, error = %e, "Trend analysis failed");
                }
                (variable, report)
            })
            .collect()
    }

    /// Correlation matrix of a cancer dataset against the risk factors of one cohort
    #[must_use]
    pub fn correlation(&self, primary: Dataset, cohort: Cohort) -> CorrelationMatrix {
        self.correlation.correlate(
            self.store.table(primary, cohort),
            self.store.table(Dataset::RiskFactors, cohort),
        )
    }

    fn scatter_inputs(
        &self,
        primary: Dataset,
        cohort: Cohort,
        cancer: &str,
        factor: &str,
    ) -> AnalysisResult<(&'a TimeSeries, &'a TimeSeries)> {
        let cancer_series = self
            .store
            .table(primary, cohort)
            .get(cancer)
            .ok_or_else(|| AnalysisError::UnknownVariable(cancer.to_string()))?;
        let factor_series = self
            .store
            .table(Dataset::RiskFactors, cohort)
            .get(factor)
            .ok_or_else(|| AnalysisError::UnknownVariable(factor.to_string()))?;
        Ok((cancer_series, factor_series))
    }

    /// Scatter data of a cancer type against a risk factor, sorted by the factor
    pub fn scatter(
        &self,
        primary: Dataset,
        cohort: Cohort,
        cancer: &str,
        factor: &str,
    ) -> AnalysisResult<Vec<ScatterPoint>> {
        let (cancer_series, factor_series) = self.scatter_inputs(primary, cohort, cancer, factor)?;
        Ok(scatter_points(cancer_series, factor_series))
    }

    /// Smooth the scatter with an external LOWESS routine and summarize it
    pub fn lowess<S: CurveSmoother + ?Sized>(
        &self,
        smoother: &S,
        primary: Dataset,
        cohort: Cohort,
        cancer: &str,
        factor: &str,
        fraction: f64,
    ) -> AnalysisResult<(Vec<(f64, f64)>, LowessSummary)> {
        let (cancer_series, factor_series) = self.scatter_inputs(primary, cohort, cancer, factor)?;
        summarize_relationship(smoother, cancer_series, factor_series, fraction)
    }

    /// Scatter and LOWESS trend line of a cancer type against a risk factor
    ///
    /// Uses [`LowessSmoother`] and the configured fraction unless one is given.
    pub fn relationship(
        &self,
        primary: Dataset,
        cohort: Cohort,
        cancer: &str,
        factor: &str,
        fraction: Option<f64>,
    ) -> AnalysisResult<RelationshipReport> {
        let fraction = fraction.unwrap_or(self.lowess_fraction);
        let points = self.scatter(primary, cohort, cancer, factor)?;
        let (curve, summary) = self.lowess(&LowessSmoother::new(), primary, cohort, cancer, factor, fraction)?;

        Ok(RelationshipReport {
            cohort,
            cancer: cancer.to_string(),
            factor: factor.to_string(),
            fraction,
            points,
            curve,
            summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CohortTables, SeriesTable};

    fn table(years: &[i32], columns: &[(&str, &[f64])]) -> SeriesTable {
        let series = columns
            .iter()
            .map(|(name, values)| TimeSeries::new(*name, years.iter().copied().zip(values.iter().copied())).unwrap())
            .collect();
        SeriesTable::new(years.to_vec(), series)
    }

    fn store() -> DataStore {
        let years = [2000, 2001, 2002, 2003];
        let incidence = CohortTables {
            female: table(
                &years,
                &[("Krebs gesamt (C00-C97 ohne C44)", &[400.0, 405.0, 410.0, 420.0]), ("Brust", &[110.0, 112.0, 111.0, 115.0])],
            ),
            male: table(
                &years,
                &[("Krebs gesamt (C00-C97 ohne C44)", &[500.0, 495.0, 490.0, 480.0]), ("Prostata", &[100.0, 104.0, 103.0, 108.0])],
            ),
        };
        let risk_factors = CohortTables {
            female: table(&years, &[("Rauchen", &[25.0, 24.0, 23.5, 22.0])]),
            male: table(&years, &[("Rauchen", &[33.0, 32.0, 31.0, 30.5])]),
        };
        DataStore::new(incidence, CohortTables::default(), risk_factors)
    }

    #[test]
    fn test_variables_and_default() {
        let store = store();
        let dashboard = Dashboard::new(&store);
        assert_eq!(
            dashboard.variables(Dataset::Incidence),
            vec!["Brust", "Krebs gesamt (C00-C97 ohne C44)", "Prostata"]
        );
        assert_eq!(
            dashboard.default_variable(Dataset::Incidence).as_deref(),
            Some("Krebs gesamt (C00-C97 ohne C44)")
        );
        assert_eq!(dashboard.default_variable(Dataset::RiskFactors).as_deref(), Some("Rauchen"));
        assert_eq!(dashboard.default_variable(Dataset::Mortality), None);
    }

    #[test]
    fn test_trend_divergent_totals() {
        let store = store();
        let report = Dashboard::new(&store)
            .trend(Dataset::Incidence, "Krebs gesamt (C00-C97 ohne C44)")
            .unwrap();
        assert!(report.result(Cohort::Female).unwrap().slope > 0.0);
        assert!(report.result(Cohort::Male).unwrap().slope < 0.0);
        assert!(report
            .comparison
            .narrative
            .contains("Bei Frauen steigt die Fallzahl, während sie bei Männern sinkt."));
    }

    #[test]
    fn test_trend_single_cohort_variable() {
        let store = store();
        let report = Dashboard::new(&store).trend(Dataset::Incidence, "Prostata").unwrap();
        assert!(report.result(Cohort::Female).is_none());
        assert!(report.comparison.narrative.starts_with("Bei Männern liegt"));
    }

    #[test]
    fn test_trend_unknown_variable() {
        let store = store();
        let err = Dashboard::new(&store).trend(Dataset::Incidence, "Leber").unwrap_err();
        assert_eq!(err, AnalysisError::UnknownVariable("Leber".to_string()));
    }

    #[test]
    fn test_correlation_uses_cohort_tables() {
        let store = store();
        let matrix = Dashboard::new(&store).correlation(Dataset::Incidence, Cohort::Male);
        assert_eq!(matrix.rows, vec!["Krebs gesamt (C00-C97 ohne C44)", "Prostata"]);
        assert_eq!(matrix.columns, vec!["Rauchen"]);
    }

    #[test]
    fn test_run_trend_uses_default_variable() {
        let store = store();
        let outcome = Dashboard::new(&store)
            .run(AnalysisMode::Trend(Dataset::Incidence), &Selection::default())
            .unwrap();
        let AnalysisOutcome::Trend(results) = outcome else {
            panic!("expected trend outcome");
        };
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].0, "Krebs gesamt (C00-C97 ohne C44)");
        let report = results[0].1.as_ref().unwrap();
        assert_eq!(report.series.len(), 2);

        let outcome = Dashboard::new(&store)
            .run(AnalysisMode::Trend(Dataset::Incidence), &Selection::variable("Prostata"))
            .unwrap();
        let AnalysisOutcome::Trend(results) = outcome else {
            panic!("expected trend outcome");
        };
        let report = results[0].1.as_ref().unwrap();
        assert_eq!(report.series.len(), 1);
        assert_eq!(report.series[0].0, Cohort::Male);
    }

    #[test]
    fn test_run_trend_without_variables() {
        let store = store();
        let err = Dashboard::new(&store)
            .run(AnalysisMode::Trend(Dataset::Mortality), &Selection::default())
            .unwrap_err();
        assert_eq!(err, AnalysisError::NoVariables(Dataset::Mortality));
    }

    #[test]
    fn test_run_correlation_single_cohort() {
        let store = store();
        let outcome = Dashboard::new(&store)
            .run(AnalysisMode::Correlation(Dataset::Incidence), &Selection::cohort(Cohort::Female))
            .unwrap();
        let AnalysisOutcome::Correlation(matrices) = outcome else {
            panic!("expected correlation outcome");
        };
        assert_eq!(matrices.len(), 1);
        assert_eq!(matrices[0].0, Cohort::Female);
        assert_eq!(matrices[0].1.columns, vec!["Rauchen"]);
    }

    #[test]
    fn test_chart_series() {
        let store = store();
        let series = Dashboard::new(&store).chart_series(Dataset::Incidence, "Brust");
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].0, Cohort::Female);
    }
}
