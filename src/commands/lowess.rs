use anyhow::Result;

use oncotrend::config::Config;
use oncotrend::dashboard::Dashboard;
use oncotrend::i18n::t;
use oncotrend::report;

use super::{load_store, parse_cancer_dataset, parse_cohort, OutputFormat};

pub fn lowess(
    config: &Config,
    cohort: &str,
    cancer: &str,
    factor: &str,
    dataset: &str,
    fraction: Option<f64>,
    format: OutputFormat,
) -> Result<()> {
    let cohort = parse_cohort(cohort)?;
    let dataset = parse_cancer_dataset(dataset)?;
    let store = load_store(config)?;
    let dashboard = Dashboard::with_config(&store, &config.analysis);

    let relationship = dashboard.relationship(dataset, cohort, cancer, factor, fraction)?;

    match format {
        OutputFormat::Json => println!("{}", report::to_json(&relationship)?),
        OutputFormat::Text => {
            println!("Zusammenhang ({cohort}): {cancer} vs. {factor}");
            println!("{}", t!("report.lowess_heading"));
            for line in report::lowess_lines(&relationship.summary) {
                println!("{line}");
            }
            println!();
            println!("{factor},{cancer}");
            for (x, y) in &relationship.curve {
                println!("{x},{y:.4}");
            }
        }
    }
    Ok(())
}
