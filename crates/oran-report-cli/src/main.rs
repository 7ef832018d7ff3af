mod runner;
mod synthetic;

use anyhow::{Context, Result};
use clap::Parser;
use oran_abstract::{HEADER_FIELDS, RepositoryConfig};
use oran_reports::ReportRegistry;
use oran_repository::ReportRepository;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::synthetic::SyntheticConfig;

#[derive(Parser, Debug)]
#[command(author, version, about = "Replay and inspect O-RAN report streams")]
struct Args {
    /// Replay a scenario file and check its assertions.
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Number of eNBs producing synthetic reports (used without --scenario).
    #[arg(long, default_value_t = 3)]
    enbs: usize,

    /// Number of synthetic reporting steps.
    #[arg(long, default_value_t = 5)]
    steps: u32,

    /// Seconds between synthetic reporting steps.
    #[arg(long, default_value_t = 1.0)]
    interval: f64,

    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Keep only reports newer than this many seconds.
    #[arg(long)]
    retention_secs: Option<f64>,

    /// Print the registered report kinds and their fields, then exit.
    #[arg(long, default_value_t = false)]
    list_kinds: bool,

    /// Write a JSON trace of the repository.
    #[arg(long)]
    trace_out: Option<PathBuf>,

    /// Only log warnings and errors.
    #[arg(long, short, default_value_t = false)]
    quiet: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.quiet);
    info!("oran-report-cli starting…");

    let registry =
        ReportRegistry::with_builtin_reports().context("Failed to register report kinds")?;

    if args.list_kinds {
        print_kinds(&registry);
        return Ok(());
    }

    match &args.scenario {
        Some(path) => run_scenario_file(&args, path, &registry),
        None => run_synthetic(&args),
    }
}

fn run_scenario_file(args: &Args, path: &Path, registry: &ReportRegistry) -> Result<()> {
    let scenario = runner::load_scenario(path)?;
    let outcome = runner::run_scenario(&scenario, registry)?;
    print_reports(&outcome.repository);
    finish(args, &outcome.repository)?;
    if !outcome.passed() {
        anyhow::bail!(
            "{} assertion(s) failed in scenario '{}'",
            outcome.failures.len(),
            scenario.name
        );
    }
    Ok(())
}

fn run_synthetic(args: &Args) -> Result<()> {
    let config = SyntheticConfig {
        enbs: args.enbs,
        steps: args.steps,
        interval_secs: args.interval,
        seed: args.seed,
    };
    let repo_config = RepositoryConfig {
        retention_secs: args.retention_secs,
        ..Default::default()
    };
    repo_config
        .validate()
        .context("Invalid --retention-secs")?;
    let repository = synthetic::run_synthetic(&config, repo_config);
    print_reports(&repository);
    finish(args, &repository)
}

fn init_logging(quiet: bool) {
    if quiet {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .init();
    } else {
        tracing_subscriber::fmt::init();
    }
}

fn print_kinds(registry: &ReportRegistry) {
    for kind in registry.kinds() {
        let Some(descriptor) = registry.descriptor(kind.as_str()) else {
            continue;
        };
        println!("{kind}: {}", descriptor.description);
        for field in HEADER_FIELDS.iter().chain(descriptor.fields) {
            println!(
                "  {:<22} {:<9} {}",
                field.name,
                field.ty.to_string(),
                field.description
            );
        }
    }
}

/// Emit the textual report stream, one line per report, grouped by entity.
fn print_reports(repository: &ReportRepository) {
    for entity in repository.entities() {
        for entry in repository.query(entity).iter() {
            println!("[{entity}] #{} {}", entry.index(), entry.report());
        }
    }
}

fn finish(args: &Args, repository: &ReportRepository) -> Result<()> {
    if let Some(path) = &args.trace_out {
        write_trace(path, repository)?;
    }
    Ok(())
}

fn write_trace(path: &Path, repository: &ReportRepository) -> Result<()> {
    let trace = repository.export_trace();
    let data = serde_json::to_vec_pretty(&trace).context("Failed to serialize report trace")?;
    fs::write(path, &data)
        .with_context(|| format!("Failed to write trace file {}", path.display()))?;
    info!("Wrote {} reports to {}", trace.total_reports, path.display());
    Ok(())
}
