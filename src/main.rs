//! ids-predict entrypoint: one log export in, labeled CSV and technique summary out.
//! Every failure is reported once, with a hint about column conformity, and no output is written.

use clap::Parser;
use ids_predict::{
    config::AppConfig,
    ingest::read_csv_path,
    logging::StructuredLogger,
    model::ArtifactRegistry,
    pipeline::{Pipeline, Prediction},
    report::{write_csv_file, LabelSummary},
    sensor::SensorVariant,
    PipelineError,
};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(name = "ids-predict", version, about = "Label IDS log exports with predicted attack techniques")]
struct Cli {
    /// Sensor that produced the export: snort or suricata
    #[arg(short, long)]
    sensor: SensorVariant,

    /// Log export (CSV)
    #[arg(short, long)]
    input: PathBuf,

    /// Labeled output CSV [default: predictions_<sensor>.csv]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON config file; defaults apply when it does not exist
    #[arg(short, long, env = "IDS_PREDICT_CONFIG", default_value = "config.json")]
    config: PathBuf,

    /// Print the summary as one JSON line instead of a chart
    #[arg(long)]
    summary_json: bool,

    /// Width in characters of the longest bar in the summary chart
    #[arg(long, default_value_t = 40)]
    chart_width: usize,
}

#[derive(Serialize)]
struct SummaryLine<'a> {
    sensor: SensorVariant,
    input: &'a str,
    output: &'a str,
    #[serde(flatten)]
    summary: &'a LabelSummary,
}

fn run(cli: &Cli, config: &AppConfig) -> Result<(), PipelineError> {
    let registry = ArtifactRegistry::from_config(config.clone());
    let pipeline = Pipeline::for_variant(cli.sensor, config, &registry)?;

    let raw = read_csv_path(&cli.input)?;
    info!(input = %cli.input.display(), rows = raw.len(), "log export loaded");

    let Prediction { table, summary } = pipeline.run(raw)?;

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("predictions_{}.csv", cli.sensor)));
    write_csv_file(&output, &table)?;

    let mut stdout = std::io::stdout().lock();
    if cli.summary_json {
        let input = cli.input.to_string_lossy();
        let output = output.to_string_lossy();
        let line = SummaryLine {
            sensor: cli.sensor,
            input: &input,
            output: &output,
            summary: &summary,
        };
        StructuredLogger::emit_json(&line, &mut stdout)?;
    } else {
        use std::io::Write;
        writeln!(stdout, "Prediction summary ({} rows)", summary.total)?;
        write!(stdout, "{}", summary.bar_chart(cli.chart_width))?;
        writeln!(stdout, "Labeled table written to {}", output.display())?;
    }
    Ok(())
}

fn fail(sensor: SensorVariant, e: &PipelineError) -> ExitCode {
    error!(sensor = %sensor, error = %e, "prediction failed");
    eprintln!("Error while processing the {} log export: {}", sensor, e);
    if !matches!(e, PipelineError::Config { .. }) {
        eprintln!(
            "Hint: check that the CSV columns match the standard {} log format.",
            sensor
        );
    }
    ExitCode::FAILURE
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = match AppConfig::load(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            let defaults = AppConfig::default();
            StructuredLogger::init(defaults.log.json, &defaults.log.level);
            return fail(cli.sensor, &e);
        }
    };

    StructuredLogger::init(config.log.json, &config.log.level);

    info!(sensor = %cli.sensor, config = %cli.config.display(), "ids-predict starting");

    match run(&cli, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => fail(cli.sensor, &e),
    }
}
