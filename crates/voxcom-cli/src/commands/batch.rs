use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;
use voxcom_core::check::{default_log_path, CheckRunner};
use voxcom_core::config::CheckConfig;
use voxcom_core::error::VoxcomError;
use voxcom_core::report::LogMode;

use super::check::{SourceArg, SpaceArg};

#[derive(Clone, Copy, ValueEnum)]
pub enum BatchModeArg {
    /// Create a fresh log
    Write,
    /// Append to an existing log
    Append,
}

#[derive(Args)]
pub struct BatchArgs {
    /// Manifest file listing one volume path per line
    pub manifest: PathBuf,

    /// Output log file (CSV); defaults to data.csv next to the manifest
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Log write mode
    #[arg(short, long, value_enum, default_value = "write")]
    pub mode: BatchModeArg,

    /// Coordinate space for the center of mass
    #[arg(long, value_enum, default_value = "mm")]
    pub space: SpaceArg,

    /// Distance from the origin above which a file is flagged off center
    #[arg(short, long, default_value = "20.0")]
    pub threshold: f64,

    /// Center-of-mass source
    #[arg(long, value_enum, default_value = "fslstats")]
    pub source: SourceArg,

    /// fslstats executable to invoke
    #[arg(long, default_value = "fslstats")]
    pub fsl_command: PathBuf,

    /// Abort if the output log already exists
    #[arg(long)]
    pub no_overwrite: bool,
}

pub fn run(args: &BatchArgs) -> Result<()> {
    let config = CheckConfig {
        threshold: args.threshold,
        space: args.space.into(),
        source: args.source.into(),
        fsl_command: args.fsl_command.clone(),
        overwrite: !args.no_overwrite,
    };

    let contents = std::fs::read_to_string(&args.manifest)
        .with_context(|| format!("Failed to read manifest {}", args.manifest.display()))?;
    let entries: Vec<&str> = contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    debug!(count = entries.len(), "manifest entries");

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_log_path(&args.manifest));
    let log_mode = match args.mode {
        BatchModeArg::Write => LogMode::Write,
        BatchModeArg::Append => LogMode::Append,
    };
    let mut runner = match CheckRunner::create(&output, log_mode, &config) {
        Ok(runner) => runner,
        Err(VoxcomError::LogExists(path)) => {
            println!(
                "Need permission to overwrite {}; run without --no-overwrite",
                path.display()
            );
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let pb = ProgressBar::new(entries.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg} [{bar:40}] {pos}/{len}")?
            .progress_chars("=> "),
    );
    pb.set_message("Checking volumes");

    let mut flagged = 0usize;
    for entry in &entries {
        let row = runner.run(Path::new(entry))?;
        if row.last().is_some_and(|flag| !flag.is_empty()) {
            flagged += 1;
        }
        pb.inc(1);
    }
    pb.finish_with_message("Done");

    let log_path = runner.log_path().to_path_buf();
    runner.finish()?;

    println!(
        "\nChecked {} volume(s): {} ok, {} flagged",
        entries.len(),
        entries.len() - flagged,
        flagged
    );
    println!("Log written to {}", log_path.display());

    Ok(())
}
