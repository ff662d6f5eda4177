//! Core data structures for oncotrend
//!
//! This module contains the time-series and cohort types shared by the
//! loader, the analytics engine and the report layer.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::data::DataError;

/// Name of the year column in every source table
pub const YEAR_COLUMN: &str = "Jahr";

/// Cancer type preselected in the incidence and mortality views
pub const DEFAULT_CANCER_TYPE: &str = "Krebs gesamt (C00-C97 ohne C44)";

/// Population cohort a table belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cohort {
    /// Women ("Frauen")
    Female,
    /// Men ("Männer")
    Male,
}

impl Cohort {
    /// All cohorts, women first
    #[must_use]
    pub fn all() -> [Cohort; 2] {
        [Self::Female, Self::Male]
    }

    /// German plural label used in headings ("Frauen", "Männer")
    #[must_use]
    pub fn german_label(&self) -> &'static str {
        match self {
            Self::Female => "Frauen",
            Self::Male => "Männer",
        }
    }

    /// German dative plural used inside narrative sentences
    #[must_use]
    pub fn german_dative(&self) -> &'static str {
        match self {
            Self::Female => "Frauen",
            Self::Male => "Männern",
        }
    }

    /// Parse from a string such as "w", "female", "frauen", "m", "männer"
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "w" | "f" | "female" | "women" | "frauen" => Some(Self::Female),
            "m" | "male" | "men" | "männer" | "maenner" => Some(Self::Male),
            _ => None,
        }
    }
}

impl std::fmt::Display for Cohort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.german_label())
    }
}

/// Source dataset a trend analysis runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dataset {
    /// Age-standardized incidence per 100,000
    Incidence,
    /// Age-standardized mortality per 100,000
    Mortality,
    /// Risk-factor prevalence and exposure
    RiskFactors,
}

impl Dataset {
    /// All datasets
    #[must_use]
    pub fn all() -> [Dataset; 3] {
        [Self::Incidence, Self::Mortality, Self::RiskFactors]
    }

    /// Stable identifier
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Incidence => "incidence",
            Self::Mortality => "mortality",
            Self::RiskFactors => "risk_factors",
        }
    }

    /// German name of the analysis area
    #[must_use]
    pub fn german_label(&self) -> &'static str {
        match self {
            Self::Incidence => "Inzidenz",
            Self::Mortality => "Mortalität",
            Self::RiskFactors => "Risikofaktoren",
        }
    }

    /// Variable preselected when the area is opened
    #[must_use]
    pub fn default_variable(&self) -> Option<&'static str> {
        match self {
            Self::Incidence | Self::Mortality => Some(DEFAULT_CANCER_TYPE),
            Self::RiskFactors => None,
        }
    }

    /// Y-axis title for a variable of this dataset
    #[must_use]
    pub fn axis_title(&self, variable: &str) -> &'static str {
        match self {
            Self::Incidence => "Inzidenz pro 100.000 Einwohner",
            Self::Mortality => "Mortalitätsrate pro 100.000 Einwohner",
            Self::RiskFactors => match variable {
                "Alkoholkonsum_avg_täglich(g)" => "Durchschnittlicher Alkoholkonsum täglich (in g)",
                "Feinstaubkonzentration (PM2.5)" => "Feinstaubkonzentration (PM2.5)",
                _ => "Altersandardisierte Prävalenz (%)",
            },
        }
    }

    /// Parse from an identifier or German name
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "incidence" | "inzidenz" => Some(Self::Incidence),
            "mortality" | "mortalität" | "mortalitaet" => Some(Self::Mortality),
            "risk_factors" | "riskfactors" | "risikofaktoren" => Some(Self::RiskFactors),
            _ => None,
        }
    }
}

impl std::fmt::Display for Dataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single observation of a series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Calendar year
    pub year: i32,

    /// Observed value (rate per 100,000, prevalence, grams, ...)
    pub value: f64,
}

/// A named numeric variable observed over strictly increasing years
///
/// Missing observations are never stored; callers construct the series from
/// the non-missing cells only. The series is read-only once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    variable_name: String,
    points: Vec<Observation>,
}

impl TimeSeries {
    /// Build a series from `(year, value)` pairs
    ///
    /// Non-finite values are treated as missing and skipped. Years must be
    /// strictly increasing.
    pub fn new<I>(variable_name: impl Into<String>, points: I) -> Result<Self, DataError>
    where
        I: IntoIterator<Item = (i32, f64)>,
    {
        let variable_name = variable_name.into();
        let mut out: Vec<Observation> = Vec::new();

        for (year, value) in points {
            if !value.is_finite() {
                continue;
            }
            if let Some(last) = out.last() {
                if year <= last.year {
                    return Err(DataError::UnorderedYears {
                        column: variable_name,
                        previous: last.year,
                        year,
                    });
                }
            }
            out.push(Observation { year, value });
        }

        Ok(Self {
            variable_name,
            points: out,
        })
    }

    /// Variable identifier (column name in the source table)
    #[must_use]
    pub fn variable_name(&self) -> &str {
        &self.variable_name
    }

    /// Observations in ascending year order
    #[must_use]
    pub fn points(&self) -> &[Observation] {
        &self.points
    }

    /// Number of observations
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the series has no observations
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Years in ascending order
    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.points.iter().map(|p| p.year)
    }

    /// Values in year order
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.value)
    }

    /// Value observed in `year`, if any
    #[must_use]
    pub fn value_at(&self, year: i32) -> Option<f64> {
        self.points
            .binary_search_by_key(&year, |p| p.year)
            .ok()
            .map(|idx| self.points[idx].value)
    }

    /// First observation (earliest year)
    #[must_use]
    pub fn first(&self) -> Option<&Observation> {
        self.points.first()
    }
}

/// One loaded table: a year axis and one series per column
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeriesTable {
    years: Vec<i32>,
    columns: Vec<TimeSeries>,
}

impl SeriesTable {
    /// Assemble a table from its year axis and column series
    #[must_use]
    pub fn new(years: Vec<i32>, columns: Vec<TimeSeries>) -> Self {
        Self { years, columns }
    }

    /// Year axis of the table (ascending)
    #[must_use]
    pub fn years(&self) -> &[i32] {
        &self.years
    }

    /// Column series in source order
    #[must_use]
    pub fn columns(&self) -> &[TimeSeries] {
        &self.columns
    }

    /// Column names in source order
    pub fn variable_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(TimeSeries::variable_name)
    }

    /// Look up a column by name
    #[must_use]
    pub fn get(&self, variable: &str) -> Option<&TimeSeries> {
        self.columns.iter().find(|s| s.variable_name() == variable)
    }

    /// Check whether a column exists
    #[must_use]
    pub fn contains(&self, variable: &str) -> bool {
        self.get(variable).is_some()
    }

    /// Number of columns
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Check if the table has no columns
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// The same kind of table for both cohorts
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CohortTables {
    /// Table for women
    pub female: SeriesTable,

    /// Table for men
    pub male: SeriesTable,
}

impl CohortTables {
    /// Table of one cohort
    #[must_use]
    pub fn get(&self, cohort: Cohort) -> &SeriesTable {
        match cohort {
            Cohort::Female => &self.female,
            Cohort::Male => &self.male,
        }
    }

    /// Sorted union of variable names across both cohorts
    #[must_use]
    pub fn variables(&self) -> Vec<String> {
        self.female
            .variable_names()
            .chain(self.male.variable_names())
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_skips_missing_values() {
        let series =
            TimeSeries::new("Rauchen", vec![(2000, 30.0), (2001, f64::NAN), (2002, 28.0)]).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.years().collect::<Vec<_>>(), vec![2000, 2002]);
        assert_eq!(series.value_at(2001), None);
        assert_eq!(series.value_at(2002), Some(28.0));
    }

    #[test]
    fn test_series_rejects_unordered_years() {
        let err = TimeSeries::new("Lunge", vec![(2001, 1.0), (2001, 2.0)]).unwrap_err();
        assert!(matches!(err, DataError::UnorderedYears { year: 2001, .. }));
    }

    #[test]
    fn test_dataset_parse_roundtrip() {
        for dataset in Dataset::all() {
            assert_eq!(Dataset::parse(dataset.as_str()), Some(dataset));
        }
        assert_eq!(Dataset::parse("Mortalität"), Some(Dataset::Mortality));
        assert_eq!(Dataset::parse("risk-factors"), Some(Dataset::RiskFactors));
    }

    #[test]
    fn test_cohort_parse() {
        assert_eq!(Cohort::parse("w"), Some(Cohort::Female));
        assert_eq!(Cohort::parse("Männer"), Some(Cohort::Male));
        assert_eq!(Cohort::parse("x"), None);
    }

    #[test]
    fn test_variables_sorted_union() {
        let a = TimeSeries::new("Brust", vec![(2000, 1.0)]).unwrap();
        let b = TimeSeries::new("Prostata", vec![(2000, 1.0)]).unwrap();
        let c = TimeSeries::new("Darm", vec![(2000, 1.0)]).unwrap();
        let tables = CohortTables {
            female: SeriesTable::new(vec![2000], vec![a, c.clone()]),
            male: SeriesTable::new(vec![2000], vec![b, c]),
        };
        assert_eq!(tables.variables(), vec!["Brust", "Darm", "Prostata"]);
    }
}
