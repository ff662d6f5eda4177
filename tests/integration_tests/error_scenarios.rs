//! Error scenario integration tests
//!
//! Tests various failure modes and error handling:
//! 1. Missing or malformed source tables
//! 2. Series too short for a regression
//! 3. Unknown variables and invalid parameters
//! 4. Localized messages of the unified error type

use oncotrend::analytics::AnalysisError;
use oncotrend::dashboard::Dashboard;
use oncotrend::data::{DataError, DataStore};
use oncotrend::error::{Error, ErrorCategory, OncoErrorTrait};
use oncotrend::i18n::set_locale;
use oncotrend::models::{Cohort, Dataset};
use serial_test::serial;

use super::fixtures::{DataDir, IdentitySmoother, MALFORMED_RISK_FACTORS, SPARSE_INCIDENCE_M};

// ============================================================================
// Loading Errors
// ============================================================================

#[test]
fn test_missing_table_aborts_load() {
    let data = DataDir::new();
    std::fs::remove_file(data.file("Krebsdaten_Mortalität_w.csv")).unwrap();

    let err = DataStore::load(&data.config().data).unwrap_err();
    match &err {
        DataError::Io { path, .. } => assert!(path.ends_with("Krebsdaten_Mortalität_w.csv")),
        other => panic!("unexpected error: {other}"),
    }

    let unified = Error::from(err);
    assert_eq!(unified.category(), ErrorCategory::Data);
}

#[test]
fn test_malformed_number_aborts_load() {
    let data = DataDir::new();
    std::fs::write(data.file("risk_factors_w.csv"), MALFORMED_RISK_FACTORS).unwrap();

    let err = DataStore::load(&data.config().data).unwrap_err();
    assert!(matches!(
        err,
        DataError::InvalidNumber { ref column, year: 2001, .. } if column == "Rauchen"
    ));
}

// ============================================================================
// Analysis Errors
// ============================================================================

#[test]
#[serial]
fn test_single_point_series_is_reported() {
    set_locale("de");
    let data = DataDir::new();
    std::fs::write(data.file("Krebsdaten_m.csv"), SPARSE_INCIDENCE_M).unwrap();
    let store = data.load();
    let dashboard = Dashboard::new(&store);

    assert!(store.table(Dataset::Incidence, Cohort::Male).contains("Hoden (C62)"));

    let err = dashboard.trend(Dataset::Incidence, "Hoden (C62)").unwrap_err();
    assert_eq!(
        err,
        AnalysisError::InsufficientData {
            variable: "Hoden (C62)".to_string(),
            required: 2,
            found: 1,
        }
    );

    let unified = Error::from(err);
    assert!(unified.is_insufficient_data());
    assert_eq!(unified.category(), ErrorCategory::Analysis);
    assert!(unified
        .localized_desc()
        .starts_with("Für 'Hoden (C62)' liegen zu wenige Datenpunkte vor"));

    // the other variables of the dataset are unaffected
    let results = dashboard.trend_all(Dataset::Incidence);
    let failed: Vec<&str> = results
        .iter()
        .filter(|(_, r)| r.is_err())
        .map(|(name, _)| name.as_str())
        .collect();
    assert_eq!(failed, vec!["Hoden (C62)"]);
}

#[test]
fn test_unknown_variable() {
    let data = DataDir::new();
    let store = data.load();
    let dashboard = Dashboard::new(&store);

    assert_eq!(
        dashboard.trend(Dataset::Mortality, "Prostata (C61)").unwrap_err(),
        AnalysisError::UnknownVariable("Prostata (C61)".to_string())
    );
    assert!(matches!(
        dashboard.scatter(Dataset::Incidence, Cohort::Male, "Lunge (C33-C34)", "Feinstaub"),
        Err(AnalysisError::UnknownVariable(ref v)) if v == "Feinstaub"
    ));
}

#[test]
fn test_invalid_smoothing_fraction() {
    let data = DataDir::new();
    let store = data.load();
    let dashboard = Dashboard::new(&store);

    for fraction in [0.0, 1.0, -0.2, f64::NAN] {
        let result = dashboard.lowess(
            &IdentitySmoother,
            Dataset::Incidence,
            Cohort::Male,
            "Lunge (C33-C34)",
            "Rauchen",
            fraction,
        );
        assert!(matches!(result, Err(AnalysisError::InvalidFraction(_))));
    }

    // the lowess backend is never reached with an out-of-range fraction
    let result = dashboard.relationship(Dataset::Incidence, Cohort::Male, "Lunge (C33-C34)", "Rauchen", Some(1.5));
    assert_eq!(result.unwrap_err(), AnalysisError::InvalidFraction(1.5));
}

#[test]
fn test_no_shared_years_gives_empty_matrix() {
    let data = DataDir::new();
    std::fs::write(
        data.file("risk_factors_m.csv"),
        "Jahr,Rauchen\n1990,35.0\n1991,34.0\n1992,33.5\n",
    )
    .unwrap();
    let store = data.load();

    let matrix = Dashboard::new(&store).correlation(Dataset::Incidence, Cohort::Male);
    assert!(matrix.years.is_empty());
    assert!(matrix.entries().all(|(_, _, value)| value.is_none()));
}
