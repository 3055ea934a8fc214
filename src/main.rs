use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::LevelFilter;

use burst_engine::{Config, Pipeline, RunReport};
use rating_writer::ExiftoolWriter;
use raw_decode::ExiftoolDecoder;

/// RAW formats with extractable embedded previews.
const RAW_EXTENSIONS: [&str; 8] = ["cr2", "cr3", "nef", "arw", "raf", "dng", "rw2", "orf"];

#[derive(Parser)]
#[command(name = "burstpick")]
#[command(about = "Pick the sharpest, best-exposed frame from each RAW burst and rate the rest")]
struct Cli {
    /// Directory containing RAW files (scanned one level deep)
    directory: PathBuf,

    /// Maximum seconds between consecutive shots of one burst
    #[arg(long, default_value_t = 1.0)]
    burst_threshold: f64,

    /// Weight for the normalized sharpness score
    #[arg(long, default_value_t = 0.7)]
    sharpness_weight: f64,

    /// Weight for the normalized exposure score
    #[arg(long, default_value_t = 0.3)]
    exposure_weight: f64,

    /// Extra per-pixel weight for the frame center during sharpness scoring
    #[arg(long, default_value_t = 1.5)]
    center_weight: f64,

    /// Star rating written to the best photo of each burst
    #[arg(long, default_value_t = 5)]
    rating_best: i64,

    /// Star rating written to every other photo
    #[arg(long, default_value_t = 1)]
    rating_rest: i64,

    /// Compute and show ratings without writing anything
    #[arg(long)]
    dry_run: bool,

    /// Show per-burst scoring detail and debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Also write the full burst report to a JSON file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(if cli.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Warn
        })
        .init();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    // Fail fast on a missing writer; per-file write errors later in the
    // run are recoverable, a completely absent exiftool is not.
    if !cli.dry_run && !rating_writer::exiftool_available() {
        bail!("exiftool is not installed or not in PATH; install it or use --dry-run");
    }

    let paths = scan_directory(&cli.directory)?;
    if paths.is_empty() {
        bail!(
            "no supported RAW files found in {}",
            cli.directory.display()
        );
    }
    println!(
        "Found {} RAW files in {}",
        paths.len(),
        cli.directory.display()
    );

    let config = Config {
        burst_threshold: cli.burst_threshold,
        sharpness_weight: cli.sharpness_weight,
        exposure_weight: cli.exposure_weight,
        center_weight: cli.center_weight,
        rating_best: cli.rating_best,
        rating_rest: cli.rating_rest,
        dry_run: cli.dry_run,
    };

    let pipeline = Pipeline::new(config)?;
    let report = pipeline.run(&paths, &ExiftoolDecoder::new(), &ExiftoolWriter::new())?;

    print_report(&report, cli.verbose);

    if let Some(output) = &cli.output {
        let json = serde_json::to_string_pretty(&report.bursts)
            .context("failed to serialize burst report")?;
        std::fs::write(output, json)
            .with_context(|| format!("failed to write {}", output.display()))?;
        println!("Report saved to {}", output.display());
    }

    // Every burst was still scored and selected, but failed writes make
    // the overall run non-zero so scripts notice.
    if report.write_failures > 0 {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

/// Collect supported RAW files from the top level of `directory`, sorted
/// by name so runs are reproducible regardless of filesystem order.
fn scan_directory(directory: &Path) -> Result<Vec<PathBuf>> {
    if !directory.is_dir() {
        bail!("not a directory: {}", directory.display());
    }

    let mut paths = Vec::new();
    for entry in std::fs::read_dir(directory)
        .with_context(|| format!("failed to read {}", directory.display()))?
    {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let supported = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| RAW_EXTENSIONS.contains(&e.to_lowercase().as_str()))
            .unwrap_or(false);
        if supported {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

fn print_report(report: &RunReport, verbose: bool) {
    println!("\nBursts: {}", report.bursts.len());
    for (i, burst) in report.bursts.iter().enumerate() {
        let winner = match burst.winner() {
            Some(w) => w,
            None => continue,
        };
        if verbose {
            println!(
                "  #{:<3} {:>3} photos  best: {}  (sharpness {:.1}, exposure {:.2}, combined {:.3})",
                i + 1,
                burst.len(),
                winner.file_name(),
                winner.sharpness_score,
                winner.exposure_score,
                winner.combined_score,
            );
        } else {
            println!(
                "  #{:<3} {:>3} photos  best: {}",
                i + 1,
                burst.len(),
                winner.file_name()
            );
        }
    }

    println!("\nScored:          {}", report.scored);
    println!("Decode failures: {}", report.decode_failures);
    if report.dry_run {
        println!("Dry run: ratings computed, no files were modified");
    } else {
        println!("Ratings written: {}", report.ratings_written);
        println!("Write failures:  {}", report.write_failures);
    }
}
