use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use oncotrend::config::Config;
use oncotrend::i18n::t;
use oncotrend::report;
use oncotrend::risk::{LogisticModel, RiskAssessor, RiskInput};

use super::OutputFormat;

fn read_input(path: &Path) -> Result<RiskInput> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file: {}", path.display()))?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let input = if is_json {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON input: {}", path.display()))?
    } else {
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML input: {}", path.display()))?
    };
    Ok(input)
}

pub fn risk(
    config: &Config,
    input: &Path,
    model: Option<PathBuf>,
    threshold: Option<f64>,
    format: OutputFormat,
) -> Result<()> {
    let model_path = model
        .or_else(|| config.risk.model_path.clone())
        .with_context(|| t!("cli.model_missing").to_string())?;

    let threshold = threshold.unwrap_or(config.risk.threshold);
    if !(0.0..=1.0).contains(&threshold) {
        anyhow::bail!("threshold must be within [0, 1], got {threshold}");
    }

    let model = LogisticModel::from_file(&model_path)?;
    let input = read_input(input)?;
    let assessment = RiskAssessor::new(threshold).assess(&model, &input)?;

    match format {
        OutputFormat::Json => println!("{}", report::to_json(&assessment)?),
        OutputFormat::Text => print!("{}", report::render_risk(&assessment)),
    }
    Ok(())
}
