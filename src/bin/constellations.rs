//! Command-line driver: process every constellation listed in a configuration file.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use constellations::catalogs::DirectoryTableSource;
use constellations::pipeline::{default_sinks, run_batch};
use constellations::PipelineConfig;

/// Project catalogue tables into constellation figures and write them as JSON.
#[derive(Parser, Debug)]
#[command(name = "constellations", version)]
struct Cli {
    /// Pipeline configuration (JSON)
    #[arg(value_name = "CONFIG", default_value = "data/constellations.json")]
    config: PathBuf,

    /// Directory the table locators are resolved against
    #[arg(short = 'c', long = "catalog-dir", value_name = "DIR", default_value = "catalogs")]
    catalog_dir: PathBuf,

    /// Override the configured output directory
    #[arg(short = 'o', long = "output", value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Skip PNG previews
    #[arg(long)]
    no_render: bool,

    /// Include the unscaled z component in the JSON output
    #[arg(long)]
    include_z: bool,

    /// Print each processed constellation as a table
    #[arg(long)]
    print: bool,

    /// Log filter, e.g. `debug` or `constellations=trace` (RUST_LOG takes precedence)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut config = match PipelineConfig::load_from_file(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            error!("{:#}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Some(dir) = cli.output_dir {
        config.output_dir = dir;
    }
    if cli.no_render {
        config.render = false;
    }
    config.include_z |= cli.include_z;

    let source = DirectoryTableSource::new(&cli.catalog_dir);
    let mut sinks = default_sinks(&config);
    let report = run_batch(&config, &source, &mut sinks);

    if cli.print {
        for constellation in report.processed() {
            println!("{constellation}");
        }
    }
    for (latin, e) in report.failures() {
        eprintln!("{latin}: {e:#}");
    }

    if report.num_failed() == report.outcomes.len() && !report.outcomes.is_empty() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
