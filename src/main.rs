// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use transaction_pipeline::{
    render_aggregate, render_table, write_aggregate_csv, write_table_csv, Pipeline,
    PipelineConfig, PipelineError, PipelineRun,
};

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Generate, clean, transform and aggregate a synthetic transaction table."
)]
struct Cli {
    /// Number of transactions to generate.
    #[arg(long, default_value_t = PipelineConfig::DEFAULT_ROWS)]
    rows: usize,

    /// Seed for the random generator. Drawn at random when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Rows shown in each stage preview.
    #[arg(long, default_value_t = PipelineConfig::DEFAULT_PREVIEW_ROWS)]
    preview: usize,

    /// Write every stage table as CSV into this directory.
    #[arg(long)]
    export_dir: Option<PathBuf>,

    /// Print the run report as JSON instead of previews.
    #[arg(long)]
    json: bool,

    /// Browse the stage tables in a terminal UI.
    #[arg(long, conflicts_with = "json")]
    tui: bool,
}

impl Cli {
    fn config(&self) -> PipelineConfig {
        PipelineConfig {
            rows: self.rows,
            seed: self.seed,
            preview_rows: self.preview,
        }
    }
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging();

    if let Err(err) = run(cli) {
        error!(kind = error_kind(&err), "pipeline run failed");
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

/// Pipeline error kind behind a driver failure, "other" for I/O and the like.
fn error_kind(err: &anyhow::Error) -> &'static str {
    err.downcast_ref::<PipelineError>()
        .map_or("other", PipelineError::kind)
}

fn run(cli: Cli) -> Result<()> {
    let pipeline = Pipeline::new(cli.config()).context("invalid configuration")?;
    let run = pipeline.run()?;

    if let Some(dir) = &cli.export_dir {
        export_all(dir, &run)?;
    }

    if cli.tui {
        return run_ui_mode(run);
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&run.report())?);
    } else {
        print_previews(&run, pipeline.config().preview_rows);
    }

    Ok(())
}

fn print_previews(run: &PipelineRun, n: usize) {
    println!("Generated Dummy Data:");
    print!("{}", render_table(&run.generated, n));

    println!("\nCleaned Data:");
    print!("{}", render_table(&run.cleaned, n));

    println!("\nTransformed Data:");
    print!("{}", render_table(&run.transformed, n));

    println!("\nAggregated Data:");
    print!("{}", render_aggregate(&run.aggregated, n));
}

fn export_all(dir: &Path, run: &PipelineRun) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create export directory {}", dir.display()))?;

    let tables = [
        ("generated.csv", &run.generated),
        ("cleaned.csv", &run.cleaned),
        ("transformed.csv", &run.transformed),
    ];
    for (name, table) in tables {
        let path = dir.join(name);
        write_table_csv(&path, table)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }

    let path = dir.join("aggregated.csv");
    write_aggregate_csv(&path, &run.aggregated)
        .with_context(|| format!("failed to write {}", path.display()))?;

    info!(dir = %dir.display(), "exported stage tables");
    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(run: PipelineRun) -> Result<()> {
    let mut app = ui::App::new(run);
    ui::run_ui(&mut app)
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_run: PipelineRun) -> Result<()> {
    anyhow::bail!("TUI mode not available; rebuild with --features tui")
}
