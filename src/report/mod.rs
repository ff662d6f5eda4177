//! Text and JSON rendering of analysis results
//!
//! Labels come from the active locale; the interpretation narrative is
//! always German. Undefined numbers render as "n/a".

use serde::Serialize;

use crate::analytics::{CorrelationMatrix, LowessSummary, TrendResult};
use crate::dashboard::TrendReport;
use crate::i18n::t;
use crate::models::Cohort;
use crate::risk::{RiskAssessment, DISCLAIMER};

/// Round to `digits` decimals, keeping at least one decimal place
///
/// Non-finite values render as "n/a".
#[must_use]
pub fn format_rounded(value: f64, digits: i32) -> String {
    if !value.is_finite() {
        return not_available();
    }
    let factor = 10f64.powi(digits);
    let rounded = (value * factor).round() / factor;
    // avoid "-0"
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    let text = rounded.to_string();
    if text.contains('.') {
        text
    } else {
        format!("{text}.0")
    }
}

/// Fixed number of decimals, "n/a" for undefined values
#[must_use]
pub fn format_fixed(value: Option<f64>, digits: usize) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.digits$}"),
        _ => not_available(),
    }
}

fn not_available() -> String {
    t!("report.n_a").to_string()
}

/// The four statistic lines of one cohort
#[must_use]
pub fn trend_lines(result: &TrendResult) -> Vec<String> {
    let (lower, upper) = result.confidence_interval;
    let decade = result
        .percent_change_per_decade
        .map_or_else(not_available, |v| format_rounded(v, 2));

    vec![
        t!("report.slope", value = format_rounded(result.slope, 2)).to_string(),
        t!(
            "report.confidence_interval",
            lower = format_rounded(lower, 2),
            upper = format_rounded(upper, 2)
        )
        .to_string(),
        t!("report.decade_change", value = decade).to_string(),
        t!("report.p_value", value = format_rounded(result.p_value, 4)).to_string(),
    ]
}

/// Join report lines, terminating each with a newline
fn join_lines(lines: &[String]) -> String {
    lines.iter().map(|line| format!("{line}\n")).collect()
}

/// Full text report of a trend analysis
#[must_use]
pub fn render_trend_report(report: &TrendReport) -> String {
    let mut lines = vec![
        format!("{}: {}", report.dataset.german_label(), report.variable),
        format!("({})", report.axis_title),
    ];

    for cohort in Cohort::all() {
        if let Some(result) = report.result(cohort) {
            lines.push(String::new());
            lines.push(cohort.german_label().to_string());
            lines.extend(trend_lines(result).into_iter().map(|line| format!("  {line}")));
        }
    }

    lines.push(String::new());
    lines.push(t!("report.interpretation").to_string());
    lines.push(report.comparison.narrative.trim_end().to_string());
    join_lines(&lines)
}

/// Key figures of a smoothed curve
#[must_use]
pub fn lowess_lines(summary: &LowessSummary) -> Vec<String> {
    vec![
        t!("report.lowess_delta", value = format_fixed(Some(summary.delta), 2)).to_string(),
        t!("report.lowess_delta_percent", value = format_fixed(summary.delta_percent, 2)).to_string(),
    ]
}

/// Correlation matrix as an aligned text table
#[must_use]
pub fn render_correlation(matrix: &CorrelationMatrix, cohort: Cohort) -> String {
    let mut lines = vec![t!("report.correlation_heading", cohort = cohort.german_label()).to_string()];

    if matrix.rows.is_empty() || matrix.columns.is_empty() {
        lines.push(t!("report.correlation_empty").to_string());
        return join_lines(&lines);
    }

    let label_width = matrix.rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
    let cell_width = 7;

    lines.extend(
        matrix
            .columns
            .iter()
            .enumerate()
            .map(|(idx, column)| format!("  [{}] {column}", idx + 1)),
    );

    let header: String = (1..=matrix.columns.len())
        .map(|idx| format!(" {:>cell_width$}", format!("[{idx}]")))
        .collect();
    lines.push(format!("{:label_width$}{header}", ""));

    for (row, values) in matrix.rows.iter().zip(&matrix.values) {
        let pad = label_width - row.chars().count();
        let cells: String = values
            .iter()
            .map(|value| format!(" {:>cell_width$}", format_fixed(*value, 2)))
            .collect();
        lines.push(format!("{row}{:pad$}{cells}", ""));
    }
    join_lines(&lines)
}

/// Result block of a risk assessment
#[must_use]
pub fn render_risk(assessment: &RiskAssessment) -> String {
    let mut lines = vec![
        t!("report.bmi", value = format!("{:.1}", assessment.bmi)).to_string(),
        t!("report.risk_probability", value = format!("{:.1}", assessment.percent())).to_string(),
        assessment.level.german_label().to_string(),
    ];
    if let Some(advice) = assessment.level.advice() {
        lines.push(advice.to_string());
    }
    lines.push(String::new());
    lines.push(DISCLAIMER.to_string());
    join_lines(&lines)
}

/// Pretty-printed JSON export
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}
