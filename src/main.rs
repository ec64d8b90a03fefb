use std::path::PathBuf;
use std::process;

use anyhow::Result;
use chrono::Utc;
use clap::Parser;

use cmsbench::config::{self, FileConfig, Overrides};
use cmsbench::report;
use cmsbench::suite;

#[derive(Parser)]
#[command(
    name = "cmsbench",
    version,
    about = "Benchmark harness for the CMS command-line executable"
)]
struct Cli {
    /// Path to the CMS executable under test
    #[arg(long)]
    executable: Option<PathBuf>,

    /// Directory containing the `<N>-records.txt` data files
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// CSV report output path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Dataset sizes to benchmark (comma-separated)
    #[arg(long, value_delimiter = ',')]
    sizes: Option<Vec<u64>>,

    /// Per-execution timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Optional TOML config file; explicit flags take precedence
    #[arg(long)]
    config: Option<PathBuf>,

    /// Emit the full result set as JSON on stdout instead of the summary
    #[arg(long)]
    json: bool,
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let started_at = Utc::now();

    let file = match &cli.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let config = config::resolve(
        Overrides {
            executable: cli.executable,
            data_dir: cli.data_dir,
            output: cli.output,
            sizes: cli.sizes,
            timeout_secs: cli.timeout,
        },
        file,
    );

    suite::validate_environment(&config)?;

    // In JSON mode stdout carries exactly one JSON document; progress and
    // banner lines are suppressed (warnings still go to stderr).
    let show_progress = !cli.json;

    if show_progress {
        println!("starting cms benchmark suite...");
        println!("cms executable: {}", config.executable.display());
        println!("data directory: {}", config.data_dir.display());
        println!("output file: {}", config.output.display());
        println!();
    }

    let results = suite::run_suite(&config, show_progress);

    let written = report::write_csv(&config.output, &results)?;

    if cli.json {
        println!("{}", report::format_json(&results, started_at));
    } else {
        println!("results written to {}", config.output.display());
        println!(
            "  total benchmarks: {}, successful: {}, failed: {}",
            results.len(),
            written,
            results.len() - written
        );

        print!("{}", report::format_summary(&report::summarize(&results)));
        println!("\nbenchmark complete.");
    }

    Ok(())
}

fn main() {
    // A user-initiated SIGINT keeps its default disposition, so an
    // interrupted suite dies with the conventional 130 status instead of
    // being conflated with the failure exit below.
    if let Err(err) = run() {
        eprintln!("error: {}", err);
        process::exit(1);
    }
}
