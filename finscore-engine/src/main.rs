//! FinScore - evaluate financial snapshots from the command line.
//!
//! ```text
//! finscore snapshot.json [more.json ...] > results.json
//! finscore --config ./finscore.json snapshot.json
//! ```
//!
//! Reads `~/.finscore/config.json` (or `FINSCORE_CONFIG`, or `--config`),
//! applies `FINSCORE_*` overrides and prints one JSON result per snapshot.
//! Logs go to stderr.

use anyhow::Result;
use clap::Parser;
use finscore_common::config::{config_path, CONFIG_ENV_VAR};
use finscore_common::logging::{generate_trace_id, init_logging_with_exclusions};
use finscore_common::{run_span, Error, ResultExt};
use finscore_engine::{AppConfig, EngineError, EvaluationResult, FinancialSnapshot, ScoringEngine};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "finscore")]
#[command(version)]
#[command(about = "Score and value companies from financial snapshots.", long_about = None)]
struct Cli {
    /// Snapshot files (JSON), evaluated in parallel
    #[arg(required = true, value_name = "SNAPSHOT")]
    snapshots: Vec<PathBuf>,

    /// Configuration file; takes precedence over FINSCORE_CONFIG
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print results on one line instead of pretty-printed
    #[arg(long)]
    compact: bool,
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        eprintln!("Error: {:#}", err);
        let error = err.downcast_ref::<Error>();
        if error.is_some_and(Error::is_config) {
            eprintln!("Check the file named by {} or pass --config", CONFIG_ENV_VAR);
        }
        std::process::exit(error.map_or(1, Error::exit_code));
    }
}

fn run(cli: Cli) -> Result<()> {
    let started = std::time::Instant::now();

    let config_file = cli.config.clone().unwrap_or_else(config_path);
    let config = AppConfig::load_with_env_from(&config_file).map_err(|e| {
        Error::Config(format!("{:#}", e))
            .with_context(format!("Failed to load configuration from {}", config_file.display()))
    })?;

    init_logging_with_exclusions(
        &config.observability.log_level,
        &config.observability.log_format,
        &config.observability.excluded_targets,
    );

    let trace_id = generate_trace_id();
    let span = run_span!(trace_id, files = cli.snapshots.len());
    let _enter = span.enter();

    tracing::info!("FinScore v{}", env!("CARGO_PKG_VERSION"));
    tracing::debug!(config = %config_file.display(), "Configuration loaded");

    let engine = ScoringEngine::new(config.scoring).map_err(|e| match e {
        EngineError::Configuration(validation) => Error::Validation(validation),
    })?;

    let snapshots = cli
        .snapshots
        .iter()
        .map(|path| read_snapshot(path))
        .collect::<finscore_common::Result<Vec<_>>>()?;

    let results: Vec<EvaluationResult> = engine.evaluate_batch(&snapshots);

    let output = render(&results, cli.compact).context("Failed to serialize results")?;
    println!("{}", output);

    tracing::info!(
        snapshots = results.len(),
        duration_ms = started.elapsed().as_millis() as u64,
        "Evaluation finished"
    );

    Ok(())
}

/// A single result prints as an object, several as an array.
fn render(results: &[EvaluationResult], compact: bool) -> serde_json::Result<String> {
    match (results, compact) {
        ([single], false) => serde_json::to_string_pretty(single),
        ([single], true) => serde_json::to_string(single),
        (_, false) => serde_json::to_string_pretty(results),
        (_, true) => serde_json::to_string(results),
    }
}

fn read_snapshot(path: &Path) -> finscore_common::Result<FinancialSnapshot> {
    let content = std::fs::read_to_string(path).context(format!("Failed to read {}", path.display()))?;
    let snapshot: FinancialSnapshot =
        serde_json::from_str(&content).context(format!("Failed to parse {}", path.display()))?;
    tracing::debug!(path = %path.display(), symbol = %snapshot.symbol, "Snapshot loaded");
    Ok(snapshot)
}
