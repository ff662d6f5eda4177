use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Translations used by the command output
rust_i18n::i18n!("locales", fallback = "de");

mod commands;

use commands::OutputFormat;

#[derive(Parser)]
#[command(
    name = "oncotrend",
    version,
    about = "Trend analysis and interpretation of German cancer statistics",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (TOML); environment variables are used otherwise
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json)
    #[arg(long, global = true)]
    log_format: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the variables of a dataset
    Variables {
        /// Dataset (incidence, mortality, risk_factors)
        #[arg(short, long, default_value = "incidence")]
        dataset: String,
    },

    /// Fit and interpret the trend of a variable for both cohorts
    Trend {
        /// Dataset (incidence, mortality, risk_factors)
        #[arg(short, long, default_value = "incidence")]
        dataset: String,

        /// Variable to analyze; defaults to the dataset's preselection
        #[arg(long)]
        variable: Option<String>,

        /// Analyze every variable of the dataset
        #[arg(long, default_value = "false", conflicts_with = "variable")]
        all: bool,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Correlate annual percent changes of cancer types with risk factors
    Correlate {
        /// Cohort (w, m)
        #[arg(long)]
        cohort: Option<String>,

        /// Cancer dataset (incidence, mortality)
        #[arg(short, long, default_value = "incidence")]
        dataset: String,

        /// Also list the strongest pairs
        #[arg(long)]
        top: Option<usize>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Print the scatter data of a cancer type against a risk factor
    Scatter {
        /// Cohort (w, m)
        #[arg(long, default_value = "w")]
        cohort: String,

        /// Cancer type
        #[arg(long)]
        cancer: String,

        /// Risk factor
        #[arg(long)]
        factor: String,

        /// Cancer dataset (incidence, mortality)
        #[arg(short, long, default_value = "incidence")]
        dataset: String,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Smooth a cancer type against a risk factor with LOWESS and summarize the trend line
    Lowess {
        /// Cohort (w, m)
        #[arg(long, default_value = "w")]
        cohort: String,

        /// Cancer type
        #[arg(long)]
        cancer: String,

        /// Risk factor
        #[arg(long)]
        factor: String,

        /// Cancer dataset (incidence, mortality)
        #[arg(short, long, default_value = "incidence")]
        dataset: String,

        /// Fraction of points per local fit; defaults to analysis.lowess_fraction
        #[arg(long)]
        fraction: Option<f64>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Assess the personal cancer risk
    Risk {
        /// Personal attributes (TOML or JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Model artifact (JSON); defaults to risk.model_path
        #[arg(short, long)]
        model: Option<PathBuf>,

        /// Override the classification threshold
        #[arg(long)]
        threshold: Option<f64>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    oncotrend::i18n::init_from_env();
    let config = commands::load_config(cli.config.as_deref(), cli.data_dir)?;

    // Initialize tracing/logging
    let log_format = cli.log_format.as_deref().unwrap_or(&config.logging.format);
    setup_tracing(log_format, &config.logging.level, cli.verbose)?;

    tracing::info!("oncotrend starting");

    match cli.command {
        Commands::Variables { dataset } => {
            tracing::info!(dataset = %dataset, "Starting variables command");
            commands::variables(&config, &dataset)?;
        }

        Commands::Trend {
            dataset,
            variable,
            all,
            format,
        } => {
            tracing::info!(
                dataset = %dataset,
                variable = ?variable,
                all = %all,
                "Starting trend command"
            );
            commands::trend(&config, &dataset, variable, all, format)?;
        }

        Commands::Correlate {
            cohort,
            dataset,
            top,
            format,
        } => {
            tracing::info!(
                cohort = ?cohort,
                dataset = %dataset,
                top = ?top,
                "Starting correlate command"
            );
            commands::correlate(&config, cohort.as_deref(), &dataset, top, format)?;
        }

        Commands::Scatter {
            cohort,
            cancer,
            factor,
            dataset,
            format,
        } => {
            tracing::info!(
                cohort = %cohort,
                cancer = %cancer,
                factor = %factor,
                "Starting scatter command"
            );
            commands::scatter(&config, &cohort, &cancer, &factor, &dataset, format)?;
        }

        Commands::Lowess {
            cohort,
            cancer,
            factor,
            dataset,
            fraction,
            format,
        } => {
            tracing::info!(
                cohort = %cohort,
                cancer = %cancer,
                factor = %factor,
                fraction = ?fraction,
                "Starting lowess command"
            );
            commands::lowess(&config, &cohort, &cancer, &factor, &dataset, fraction, format)?;
        }

        Commands::Risk {
            input,
            model,
            threshold,
            format,
        } => {
            tracing::info!(
                input = %input.display(),
                model = ?model,
                threshold = ?threshold,
                "Starting risk command"
            );
            commands::risk(&config, &input, model, threshold, format)?;
        }
    }

    tracing::info!("oncotrend completed successfully");
    Ok(())
}

fn setup_tracing(format: &str, level: &str, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("oncotrend=debug,info")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("oncotrend={level},warn")))
    };

    // Reports go to stdout, logs to stderr
    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
                .init();
        }
    }

    Ok(())
}
