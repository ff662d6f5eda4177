//! Correlation of year-over-year changes between two variable families
//!
//! Cancer types form the rows and risk factors the columns. Both tables are
//! restricted to their common years and transformed to annual percent
//! changes before the Pearson coefficients are computed.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::models::SeriesTable;

/// Annual percent-change columns of one table over a shared year axis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PercentChangeFrame {
    /// Years of the change values (the first shared year is dropped)
    pub years: Vec<i32>,

    /// `(variable, changes)` in table column order
    pub columns: Vec<(String, Vec<Option<f64>>)>,
}

impl PercentChangeFrame {
    /// Transform every column of `table` over `years` to percent changes
    ///
    /// Each column goes through [`percent_change`]. A zero previous value
    /// yields a missing change, so that year drops out of every pair the
    /// column takes part in. pandas' `pct_change` would give `inf` there
    /// and leave the whole pair's coefficient undefined instead.
    #[must_use]
    pub fn from_table(table: &SeriesTable, years: &[i32]) -> Self {
        let columns = table
            .columns()
            .iter()
            .map(|series| {
                let values: Vec<Option<f64>> = years.iter().map(|&y| series.value_at(y)).collect();
                (series.variable_name().to_string(), percent_change(&values))
            })
            .collect();

        Self {
            years: years.iter().skip(1).copied().collect(),
            columns,
        }
    }

    /// Rows where every column has a defined change
    #[must_use]
    pub fn complete_rows(&self) -> Vec<bool> {
        (0..self.years.len())
            .map(|i| self.columns.iter().all(|(_, c)| c[i].is_some()))
            .collect()
    }
}

/// Percent change of consecutive values, dropping the first point
///
/// `pct[i] = (v[i] - v[i-1]) / v[i-1] * 100`. A missing value on either
/// side or a zero previous value yields a missing change.
#[must_use]
pub fn percent_change(values: &[Option<f64>]) -> Vec<Option<f64>> {
    values
        .windows(2)
        .map(|w| match (w[0], w[1]) {
            (Some(prev), Some(cur)) if prev != 0.0 => Some((cur - prev) / prev * 100.0),
            _ => None,
        })
        .collect()
}

/// Pearson correlation coefficient of two equally long samples
///
/// Returns `None` for fewer than two observations or zero variance.
#[must_use]
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    let n = x.len();
    if n != y.len() || n < 2 {
        return None;
    }

    let mean_x = x.iter().sum::<f64>() / n as f64;
    let mean_y = y.iter().sum::<f64>() / n as f64;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (xi, yi) in x.iter().zip(y) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }

    let r = cov / (var_x * var_y).sqrt();
    r.is_finite().then(|| r.clamp(-1.0, 1.0))
}

/// Correlation coefficients between two variable families
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    /// Row variables (cancer types)
    pub rows: Vec<String>,

    /// Column variables (risk factors)
    pub columns: Vec<String>,

    /// `values[row][column]`, `None` where the coefficient is undefined
    pub values: Vec<Vec<Option<f64>>>,

    /// Shared years both tables were restricted to
    pub years: Vec<i32>,
}

impl CorrelationMatrix {
    /// Coefficient for a (row, column) pair
    ///
    /// The outer `Option` is `None` for unknown labels, the inner one for
    /// undefined coefficients.
    #[must_use]
    pub fn get(&self, row: &str, column: &str) -> Option<Option<f64>> {
        let r = self.rows.iter().position(|v| v == row)?;
        let c = self.columns.iter().position(|v| v == column)?;
        Some(self.values[r][c])
    }

    /// Iterate over all `(row, column, value)` entries
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str, Option<f64>)> {
        self.rows.iter().enumerate().flat_map(move |(r, row)| {
            self.columns
                .iter()
                .enumerate()
                .map(move |(c, col)| (row.as_str(), col.as_str(), self.values[r][c]))
        })
    }

    /// Entries ordered by absolute coefficient, strongest first
    #[must_use]
    pub fn strongest(&self, limit: usize) -> Vec<(&str, &str, f64)> {
        let mut defined: Vec<_> = self
            .entries()
            .filter_map(|(r, c, v)| v.map(|v| (r, c, v)))
            .collect();
        defined.sort_by(|a, b| {
            b.2.abs()
                .partial_cmp(&a.2.abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        defined.truncate(limit);
        defined
    }
}

/// Computes cross-correlation matrices of percent-change series
#[derive(Debug, Clone, Copy, Default)]
pub struct CorrelationEngine;

impl CorrelationEngine {
    /// Create a new engine
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Correlate every primary column with every factor column
    ///
    /// Both tables are restricted to the intersection of their year axes.
    /// Change rows with a missing value in any column of their own family
    /// are dropped, each coefficient then uses the years complete in both
    /// families.
    #[must_use]
    pub fn correlate(&self, primary: &SeriesTable, factors: &SeriesTable) -> CorrelationMatrix {
        let primary_years: BTreeSet<i32> = primary.years().iter().copied().collect();
        let shared: Vec<i32> = factors
            .years()
            .iter()
            .copied()
            .filter(|y| primary_years.contains(y))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let primary_pct = PercentChangeFrame::from_table(primary, &shared);
        let factor_pct = PercentChangeFrame::from_table(factors, &shared);

        let usable: Vec<usize> = primary_pct
            .complete_rows()
            .into_iter()
            .zip(factor_pct.complete_rows())
            .enumerate()
            .filter_map(|(i, (a, b))| (a && b).then_some(i))
            .collect();

        let values: Vec<Vec<Option<f64>>> = primary_pct
            .columns
            .iter()
            .map(|(_, row_changes)| {
                let x: Vec<f64> = usable.iter().filter_map(|&i| row_changes[i]).collect();
                factor_pct
                    .columns
                    .iter()
                    .map(|(_, col_changes)| {
                        let y: Vec<f64> = usable.iter().filter_map(|&i| col_changes[i]).collect();
                        pearson(&x, &y)
                    })
                    .collect()
            })
            .collect();

        let undefined = values.iter().flatten().filter(|v| v.is_none()).count();
        if undefined > 0 {
            tracing::warn!(undefined, "Some correlation coefficients are undefined");
        }
        tracing::debug!(
            shared_years = shared.len(),
            usable_changes = usable.len(),
            rows = primary_pct.columns.len(),
            columns = factor_pct.columns.len(),
            "Computed correlation matrix"
        );

        CorrelationMatrix {
            rows: primary_pct.columns.into_iter().map(|(name, _)| name).collect(),
            columns: factor_pct.columns.into_iter().map(|(name, _)| name).collect(),
            values,
            years: shared,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TimeSeries;

    fn table(years: &[i32], columns: &[(&str, &[f64])]) -> SeriesTable {
        let series = columns
            .iter()
            .map(|(name, values)| {
                TimeSeries::new(*name, years.iter().copied().zip(values.iter().copied())).unwrap()
            })
            .collect();
        SeriesTable::new(years.to_vec(), series)
    }

    #[test]
    fn test_percent_change() {
        let pct = percent_change(&[Some(100.0), Some(110.0), Some(99.0)]);
        assert_eq!(pct.len(), 2);
        assert!((pct[0].unwrap() - 10.0).abs() < 1e-12);
        assert!((pct[1].unwrap() + 10.0).abs() < 1e-12);
        assert_eq!(percent_change(&[Some(0.0), Some(1.0)]), vec![None]);
        assert_eq!(percent_change(&[Some(1.0), None, Some(2.0)]), vec![None, None]);
    }

    #[test]
    fn test_pearson_perfect() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [2.0, 4.0, 6.0, 8.0];
        assert!((pearson(&x, &y).unwrap() - 1.0).abs() < 1e-12);
        let z = [8.0, 6.0, 4.0, 2.0];
        assert!((pearson(&x, &z).unwrap() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_constant_is_undefined() {
        assert_eq!(pearson(&[1.0, 2.0, 3.0], &[5.0, 5.0, 5.0]), None);
        assert_eq!(pearson(&[1.0], &[2.0]), None);
    }

    #[test]
    fn test_correlate_restricts_to_shared_years() {
        let cancer = table(
            &[2000, 2001, 2002, 2003, 2004],
            &[("Lunge", &[10.0, 11.0, 12.5, 12.0, 13.0])],
        );
        let factors = table(
            &[2001, 2002, 2003, 2004, 2005],
            &[("Rauchen", &[30.0, 33.0, 32.0, 34.0, 20.0])],
        );

        let matrix = CorrelationEngine::new().correlate(&cancer, &factors);
        assert_eq!(matrix.years, vec![2001, 2002, 2003, 2004]);
        assert_eq!(matrix.rows, vec!["Lunge"]);
        assert_eq!(matrix.columns, vec!["Rauchen"]);
        let r = matrix.get("Lunge", "Rauchen").unwrap().unwrap();
        assert!((-1.0..=1.0).contains(&r));
        assert!(r > 0.0);
    }

    #[test]
    fn test_correlate_self_is_one() {
        let years = [2000, 2001, 2002, 2003];
        let values: &[f64] = &[5.0, 6.0, 5.5, 7.0];
        let cancer = table(&years, &[("Haut", values)]);
        let factors = table(&years, &[("Haut", values), ("Konstant", &[1.0, 1.0, 1.0, 1.0])]);

        let matrix = CorrelationEngine::new().correlate(&cancer, &factors);
        assert!((matrix.get("Haut", "Haut").unwrap().unwrap() - 1.0).abs() < 1e-12);
        assert_eq!(matrix.get("Haut", "Konstant"), Some(None));
        assert_eq!(matrix.get("Haut", "Unbekannt"), None);
    }

    #[test]
    fn test_correlate_drops_incomplete_rows() {
        let years = [2000, 2001, 2002, 2003, 2004];
        let cancer = table(&years, &[("Darm", &[10.0, 12.0, 11.0, 13.0, 12.0])]);
        let factors = table(
            &years,
            &[
                ("Alkohol", &[5.0, 6.0, 5.5, 6.5, 6.0]),
                ("Adipositas", &[1.0, f64::NAN, 1.2, 1.3, 1.4]),
            ],
        );
        let frame = PercentChangeFrame::from_table(&factors, &years);
        assert_eq!(frame.complete_rows(), vec![false, false, true, true]);

        let matrix = CorrelationEngine::new().correlate(&cancer, &factors);
        // Only the changes into 2003 and 2004 remain
        let r = matrix.get("Darm", "Alkohol").unwrap().unwrap();
        assert!((r - 1.0).abs() < 1e-9 || (r + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_strongest_entries() {
        let matrix = CorrelationMatrix {
            rows: vec!["A".into(), "B".into()],
            columns: vec!["X".into()],
            values: vec![vec![Some(0.2)], vec![Some(-0.9)]],
            years: vec![],
        };
        let top = matrix.strongest(1);
        assert_eq!(top, vec![("B", "X", -0.9)]);
    }
}
