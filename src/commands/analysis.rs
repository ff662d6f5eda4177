use anyhow::Result;

use oncotrend::analytics::{AnalysisResult, CorrelationMatrix};
use oncotrend::config::Config;
use oncotrend::dashboard::{AnalysisMode, AnalysisOutcome, Dashboard, Selection, TrendReport};
use oncotrend::error::{Error, OncoErrorTrait};
use oncotrend::i18n::t;
use oncotrend::models::Cohort;
use oncotrend::report;

use super::{load_store, parse_cancer_dataset, parse_cohort, parse_dataset, OutputFormat};

pub fn variables(config: &Config, dataset: &str) -> Result<()> {
    let dataset = parse_dataset(dataset)?;
    let store = load_store(config)?;
    let dashboard = Dashboard::with_config(&store, &config.analysis);

    println!("{}", t!("report.variables", dataset = dataset.german_label()));
    let default = dashboard.default_variable(dataset);
    for variable in dashboard.variables(dataset) {
        let marker = if default.as_deref() == Some(variable.as_str()) { "*" } else { " " };
        println!(" {marker} {variable}");
    }
    Ok(())
}

pub fn trend(
    config: &Config,
    dataset: &str,
    variable: Option<String>,
    all: bool,
    format: OutputFormat,
) -> Result<()> {
    let dataset = parse_dataset(dataset)?;
    let selection = Selection {
        variable,
        all,
        ..Selection::default()
    };
    dispatch(config, AnalysisMode::Trend(dataset), &selection, None, format)
}

pub fn correlate(
    config: &Config,
    cohort: Option<&str>,
    dataset: &str,
    top: Option<usize>,
    format: OutputFormat,
) -> Result<()> {
    let dataset = parse_cancer_dataset(dataset)?;
    let selection = Selection {
        cohort: cohort.map(parse_cohort).transpose()?,
        ..Selection::default()
    };
    dispatch(config, AnalysisMode::Correlation(dataset), &selection, top, format)
}

/// Run the selected analysis area and print its outcome
fn dispatch(
    config: &Config,
    mode: AnalysisMode,
    selection: &Selection,
    top: Option<usize>,
    format: OutputFormat,
) -> Result<()> {
    let store = load_store(config)?;
    let dashboard = Dashboard::with_config(&store, &config.analysis);

    match dashboard.run(mode, selection)? {
        AnalysisOutcome::Trend(results) => print_trends(results, selection.all, format),
        AnalysisOutcome::Correlation(matrices) => print_correlations(&matrices, top, format),
    }
}

fn print_trends(
    results: Vec<(String, AnalysisResult<TrendReport>)>,
    all: bool,
    format: OutputFormat,
) -> Result<()> {
    let mut reports = Vec::with_capacity(results.len());
    for (variable, result) in results {
        match result {
            Ok(report) => reports.push(report),
            // Too few points is an expected outcome, shown to the user
            Err(e) if e.is_insufficient_data() => {
                let err = Error::from(e);
                eprintln!("{}: {}", err.category().localized_desc(), err.localized_desc());
            }
            Err(e) if all => {
                tracing::warn!(variable = %variable, error = %e, "Skipping variable");
            }
            Err(e) => return Err(e.into()),
        }
    }

    match format {
        OutputFormat::Json => println!("{}", report::to_json(&reports)?),
        OutputFormat::Text => {
            for (idx, trend_report) in reports.iter().enumerate() {
                if idx > 0 {
                    println!();
                }
                print!("{}", report::render_trend_report(trend_report));
            }
        }
    }
    Ok(())
}

fn print_correlations(
    matrices: &[(Cohort, CorrelationMatrix)],
    top: Option<usize>,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let value: serde_json::Map<String, serde_json::Value> = matrices
                .iter()
                .map(|(cohort, matrix)| serde_json::to_value(matrix).map(|v| (cohort.to_string(), v)))
                .collect::<Result<_, serde_json::Error>>()?;
            println!("{}", report::to_json(&value)?);
        }
        OutputFormat::Text => {
            for (idx, (cohort, matrix)) in matrices.iter().enumerate() {
                if idx > 0 {
                    println!();
                }
                print!("{}", report::render_correlation(matrix, *cohort));
                if let Some(limit) = top {
                    println!();
                    println!("{}", t!("report.strongest"));
                    for (row, column, r) in matrix.strongest(limit) {
                        println!("  {r:+.2}  {row} / {column}");
                    }
                }
            }
        }
    }
    Ok(())
}

pub fn scatter(
    config: &Config,
    cohort: &str,
    cancer: &str,
    factor: &str,
    dataset: &str,
    format: OutputFormat,
) -> Result<()> {
    let cohort = parse_cohort(cohort)?;
    let dataset = parse_cancer_dataset(dataset)?;
    let store = load_store(config)?;
    let dashboard = Dashboard::with_config(&store, &config.analysis);

    let points = dashboard.scatter(dataset, cohort, cancer, factor)?;

    match format {
        OutputFormat::Json => println!("{}", report::to_json(&points)?),
        OutputFormat::Text => {
            println!("Zusammenhang ({cohort}): {cancer} vs. {factor}");
            println!("Jahr,{factor},{cancer}");
            for p in &points {
                println!("{},{},{}", p.year, p.x, p.y);
            }
        }
    }
    Ok(())
}
