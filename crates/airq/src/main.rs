//! CLI entry point for the air quality analysis.

use airq::charts::{build_charts, show_blocking};
use airq::reporting::text::render_report;
use airq::{AnalysisConfig, AnalysisReport, Pipeline, UndefinedMeanPolicy};
use anyhow::{Result, anyhow};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::{error, info};

/// CLI-compatible policy for columns without any value
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliUndefinedMean {
    /// Leave the column missing silently
    Ignore,
    /// Leave the column missing and record a warning
    Warn,
    /// Abort the run
    Fail,
}

impl From<CliUndefinedMean> for UndefinedMeanPolicy {
    fn from(cli: CliUndefinedMean) -> Self {
        match cli {
            CliUndefinedMean::Ignore => UndefinedMeanPolicy::Ignore,
            CliUndefinedMean::Warn => UndefinedMeanPolicy::Warn,
            CliUndefinedMean::Fail => UndefinedMeanPolicy::Fail,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Exploratory analysis of air quality monitoring data",
    long_about = "Loads an air quality export, fills missing pollutant readings with \
                  column means and reports frequencies, grouped means and pollutant \
                  correlation.\n\n\
                  EXAMPLES:\n  \
                  # Analyze the default file and show the charts\n  \
                  airq\n\n  \
                  # Another file, text report only\n  \
                  airq -i exports/2015.csv --no-display\n\n  \
                  # Machine-readable output\n  \
                  airq --json | jq .state_aggregate"
)]
struct Args {
    /// Path to the delimited input file
    #[arg(short, long, default_value = airq::config::DEFAULT_INPUT_PATH)]
    input: PathBuf,

    /// Text encoding of the input file
    #[arg(short, long, default_value = airq::config::DEFAULT_ENCODING)]
    encoding: String,

    /// Number of states listed in the state ranking
    #[arg(long, default_value = "5")]
    top_states: usize,

    /// What to do with a pollutant column that has no values at all
    #[arg(long, value_enum, default_value = "warn")]
    undefined_mean: CliUndefinedMean,

    /// Do not open the chart window
    #[arg(long)]
    no_display: bool,

    /// Output JSON to stdout instead of the text report
    ///
    /// Disables all logs and the chart window; only outputs the final JSON.
    #[arg(long)]
    json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show warnings and errors)
    #[arg(short, long)]
    quiet: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled so that stdout
/// only carries the JSON report.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    let config = AnalysisConfig::builder()
        .input_path(&args.input)
        .encoding(&args.encoding)
        .top_states(args.top_states)
        .undefined_mean_policy(args.undefined_mean.into())
        .build()?;

    let pipeline = Pipeline::builder()
        .config(config)
        .on_progress(|update| {
            tracing::debug!(
                "[{:>3.0}%] {}: {}",
                update.progress * 100.0,
                update.stage.display_name(),
                update.message
            );
        })
        .build()?;

    info!("{}", "=".repeat(80));
    info!("Starting air quality analysis...");
    info!("{}", "=".repeat(80));

    let report = match pipeline.run() {
        Ok(report) => report,
        Err(e) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&e)?);
            }
            error!("Analysis failed: {}", e);
            return Err(anyhow!("Analysis failed: {}", e));
        }
    };

    handle_output(&report, &args)
}

/// Handle pipeline output based on CLI flags.
///
/// Output behavior:
/// - Default: print the text report, then show the charts
/// - `--json`: print JSON to stdout only (no logs, no charts)
/// - `--no-display`: skip the charts
fn handle_output(report: &AnalysisReport, args: &Args) -> Result<()> {
    if args.json {
        println!("{}", airq::reporting::to_json(report)?);
        return Ok(());
    }

    print!("{}", render_report(report));

    if !args.no_display {
        show_blocking(build_charts(report))?;
    }

    Ok(())
}
