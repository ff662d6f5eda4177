//! Pipeline integration tests
//!
//! Load the fixture tables from disk, run every analysis area through the
//! dashboard and check the rendered output.

use oncotrend::analytics::{JointPattern, TrendDirection};
use oncotrend::dashboard::{AnalysisMode, AnalysisOutcome, Dashboard, Selection};
use oncotrend::i18n::set_locale;
use oncotrend::models::{Cohort, Dataset};
use oncotrend::report;
use serial_test::serial;

use super::fixtures::{DataDir, IdentitySmoother};

const TOTAL: &str = "Krebs gesamt (C00-C97 ohne C44)";

#[test]
#[serial]
fn test_incidence_trend_report() {
    set_locale("de");
    let data = DataDir::new();
    let store = data.load();
    let dashboard = Dashboard::with_config(&store, &data.config().analysis);

    assert_eq!(dashboard.default_variable(Dataset::Incidence).as_deref(), Some(TOTAL));

    let trend = dashboard.trend(Dataset::Incidence, TOTAL).unwrap();
    let female = trend.result(Cohort::Female).unwrap();
    let male = trend.result(Cohort::Male).unwrap();
    assert!((female.slope - 5.0).abs() < 1e-9);
    assert!((male.slope + 7.0).abs() < 1e-9);
    assert_eq!(female.baseline, 400.0);

    assert_eq!(
        trend.comparison.pattern,
        Some(JointPattern::Divergent {
            increasing: Cohort::Female
        })
    );
    assert_eq!(
        trend.comparison.narrative,
        "Bei Frauen liegt ein statistisch signifikanter Trend vor. \
         Bei Männern liegt ein statistisch signifikanter Trend vor. \
         Bei Frauen steigt die Fallzahl, während sie bei Männern sinkt."
    );

    let text = report::render_trend_report(&trend);
    assert!(text.starts_with("Inzidenz: Krebs gesamt"));
    assert!(text.contains("Frauen\n  Steigung: 5.0 Fälle pro Jahr."));
    assert!(text.contains("Männer\n  Steigung: -7.0 Fälle pro Jahr."));
    assert!(text.contains("Veränderung pro Dekade: 12.5 %"));
    assert!(text.contains("Interpretation der statistischen Kennzahlen"));
    assert!(text.trim_end().ends_with("während sie bei Männern sinkt."));
}

#[test]
fn test_trend_report_json() {
    let data = DataDir::new();
    let store = data.load();
    let dashboard = Dashboard::new(&store);

    let trend = dashboard.trend(Dataset::Mortality, "Lunge (C33-C34)").unwrap();
    let json: serde_json::Value = serde_json::from_str(&report::to_json(&trend).unwrap()).unwrap();

    assert_eq!(json["dataset"], "mortality");
    assert_eq!(json["variable"], "Lunge (C33-C34)");
    assert_eq!(json["comparison"]["pattern"]["kind"], "divergent");
    assert_eq!(json["comparison"]["female"]["result"]["n_points"], 5);
}

#[test]
fn test_single_cohort_variable() {
    let data = DataDir::new();
    let store = data.load();
    let dashboard = Dashboard::new(&store);

    let trend = dashboard.trend(Dataset::Incidence, "Prostata (C61)").unwrap();
    assert!(trend.result(Cohort::Female).is_none());
    assert_eq!(
        trend.result(Cohort::Male).map(|r| r.direction()),
        Some(TrendDirection::Increasing)
    );
    assert!(trend.comparison.pattern.is_none());
    assert!(trend.comparison.narrative.starts_with("Bei Männern liegt"));
    assert!(!trend.comparison.narrative.contains("Frauen"));
}

#[test]
fn test_trend_all_covers_every_variable() {
    let data = DataDir::new();
    let store = data.load();
    let dashboard = Dashboard::new(&store);

    let reports = dashboard.trend_all(Dataset::RiskFactors);
    let names: Vec<&str> = reports.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, vec!["Alkoholkonsum_avg_täglich(g)", "Rauchen"]);
    assert!(reports.iter().all(|(_, report)| report.is_ok()));

    assert_eq!(
        dashboard.default_variable(Dataset::RiskFactors).as_deref(),
        Some("Alkoholkonsum_avg_täglich(g)")
    );
}

#[test]
fn test_correlation_pipeline() {
    let data = DataDir::new();
    let store = data.load();
    let dashboard = Dashboard::new(&store);

    let matrix = dashboard.correlation(Dataset::Incidence, Cohort::Female);
    assert_eq!(matrix.years, vec![2000, 2001, 2002, 2003, 2004]);
    assert_eq!(matrix.rows.len(), 3);
    assert_eq!(matrix.columns.len(), 2);

    for (_, _, value) in matrix.entries() {
        let r = value.expect("all change rows are complete");
        assert!((-1.0..=1.0).contains(&r));
    }

    let strongest = matrix.strongest(2);
    assert_eq!(strongest.len(), 2);
    assert!(strongest[0].2.abs() >= strongest[1].2.abs());
}

#[test]
fn test_scatter_and_lowess_pipeline() {
    let data = DataDir::new();
    let store = data.load();
    let dashboard = Dashboard::new(&store);

    let points = dashboard
        .scatter(Dataset::Incidence, Cohort::Female, TOTAL, "Rauchen")
        .unwrap();
    assert_eq!(points.len(), 5);
    // smoking declines over time, so the latest year has the smallest x
    assert_eq!(points[0].year, 2004);
    assert!(points.windows(2).all(|w| w[0].x <= w[1].x));

    let (curve, summary) = dashboard
        .lowess(&IdentitySmoother, Dataset::Incidence, Cohort::Female, TOTAL, "Rauchen", 0.5)
        .unwrap();
    assert_eq!(curve.len(), 5);
    assert_eq!(summary.start, 420.0);
    assert_eq!(summary.end, 400.0);
    assert_eq!(summary.delta, -20.0);
    let percent = summary.delta_percent.unwrap();
    assert!((percent - (-20.0 / 420.0 * 100.0)).abs() < 1e-9);
}

#[test]
fn test_relationship_with_lowess_backend() {
    let data = DataDir::new();
    let store = data.load();
    let dashboard = Dashboard::with_config(&store, &data.config().analysis);

    let relationship = dashboard
        .relationship(Dataset::Incidence, Cohort::Female, TOTAL, "Rauchen", None)
        .unwrap();
    assert_eq!(relationship.fraction, 0.5);
    assert_eq!(relationship.points.len(), 5);
    assert_eq!(relationship.curve.len(), 5);

    // the curve is evaluated at the sorted factor values
    let xs: Vec<f64> = relationship.points.iter().map(|p| p.x).collect();
    let curve_xs: Vec<f64> = relationship.curve.iter().map(|(x, _)| *x).collect();
    assert_eq!(xs, curve_xs);
    assert!(relationship.curve.iter().all(|(_, y)| y.is_finite()));

    // incidence rises while smoking falls
    assert!(relationship.summary.delta < 0.0);
    assert!(relationship.summary.delta_percent.unwrap() < 0.0);

    let wider = dashboard
        .relationship(Dataset::Incidence, Cohort::Female, TOTAL, "Rauchen", Some(0.9))
        .unwrap();
    assert_eq!(wider.fraction, 0.9);
    assert!(wider.summary.delta < 0.0);
}

#[test]
fn test_dispatch_trend_and_correlation() {
    let data = DataDir::new();
    let store = data.load();
    let dashboard = Dashboard::with_config(&store, &data.config().analysis);

    match dashboard
        .run(AnalysisMode::Trend(Dataset::Incidence), &Selection::default())
        .unwrap()
    {
        AnalysisOutcome::Trend(results) => {
            assert_eq!(results.len(), 1);
            assert_eq!(results[0].0, TOTAL);
            let report = results[0].1.as_ref().unwrap();
            assert_eq!(report.series.len(), 2);
            assert_eq!(report.series[0].0, Cohort::Female);
            assert_eq!(report.series[0].1.len(), 5);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }

    match dashboard
        .run(AnalysisMode::Trend(Dataset::Mortality), &Selection::all())
        .unwrap()
    {
        AnalysisOutcome::Trend(results) => {
            assert_eq!(results.len(), dashboard.variables(Dataset::Mortality).len());
            assert!(results.iter().all(|(_, r)| r.is_ok()));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }

    match dashboard
        .run(AnalysisMode::Correlation(Dataset::Incidence), &Selection::default())
        .unwrap()
    {
        AnalysisOutcome::Correlation(matrices) => {
            let cohorts: Vec<Cohort> = matrices.iter().map(|(c, _)| *c).collect();
            assert_eq!(cohorts, vec![Cohort::Female, Cohort::Male]);
            assert_eq!(matrices[0].1, dashboard.correlation(Dataset::Incidence, Cohort::Female));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[test]
fn test_analysis_mode_labels() {
    assert_eq!(AnalysisMode::Trend(Dataset::Incidence).german_label(), "Inzidenz");
    assert_eq!(AnalysisMode::Correlation(Dataset::Mortality).german_label(), "Zusammenhang");
}
