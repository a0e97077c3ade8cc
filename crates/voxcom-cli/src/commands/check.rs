use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use voxcom_core::check::{default_log_path, CenterCheck, CheckRunner};
use voxcom_core::config::{CheckConfig, SourceKind};
use voxcom_core::error::VoxcomError;
use voxcom_core::mass::CoordSpace;
use voxcom_core::recenter::Recenter;
use voxcom_core::report::LogMode;

use crate::summary;

#[derive(Clone, Copy, ValueEnum)]
pub enum SpaceArg {
    /// World coordinates in mm
    Mm,
    /// Voxel-grid indices
    Voxel,
}

impl From<SpaceArg> for CoordSpace {
    fn from(arg: SpaceArg) -> Self {
        match arg {
            SpaceArg::Mm => CoordSpace::Mm,
            SpaceArg::Voxel => CoordSpace::Voxel,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SourceArg {
    Fslstats,
    Native,
}

impl From<SourceArg> for SourceKind {
    fn from(arg: SourceArg) -> Self {
        match arg {
            SourceArg::Fslstats => SourceKind::Fslstats,
            SourceArg::Native => SourceKind::Native,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ModeArg {
    /// Create a fresh log
    Write,
    /// Append to an existing log
    Append,
    /// Print only, write no log
    Quiet,
}

#[derive(Args)]
pub struct CheckArgs {
    /// Input NIfTI file (.nii or .nii.gz)
    pub input: PathBuf,

    /// Output log file (CSV); defaults to data.csv next to the input
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Log write mode
    #[arg(short, long, value_enum, default_value = "write")]
    pub mode: ModeArg,

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

    /// Also write a re-centered copy of the input
    #[arg(short, long)]
    pub fix: bool,

    /// Check config file (TOML); overrides the measurement flags
    #[arg(long)]
    pub config: Option<PathBuf>,
}

pub fn run(args: &CheckArgs) -> Result<()> {
    let config = load_config(args)?;

    match args.mode {
        ModeArg::Quiet => {
            let check = CenterCheck::new(config.mass_source(), config.space, config.threshold);
            let outcome = check.run(&args.input);
            summary::print_outcome(&args.input.to_string_lossy(), None, &outcome.fields());
        }
        ModeArg::Write | ModeArg::Append => {
            let output = args
                .output
                .clone()
                .unwrap_or_else(|| default_log_path(&args.input));
            let log_mode = match args.mode {
                ModeArg::Append => LogMode::Append,
                _ => LogMode::Write,
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
            let row = runner.run(&args.input)?;
            summary::print_row(&row);
            let log_path = runner.log_path().to_path_buf();
            runner.finish()?;
            println!("Log written to {}", log_path.display());
        }
    }

    if args.fix {
        let recenter = Recenter::open(&args.input, config.mass_source())?;
        let destination = recenter.fix(None)?;
        println!("Centered copy saved to {}", destination.display());
    }

    Ok(())
}

/// Load the TOML config when given, else build one from the flags.
pub fn load_config(args: &CheckArgs) -> Result<CheckConfig> {
    if let Some(ref config_path) = args.config {
        let contents = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config {}", config_path.display()))?;
        toml::from_str(&contents).context("Invalid check config")
    } else {
        Ok(CheckConfig {
            threshold: args.threshold,
            space: args.space.into(),
            source: args.source.into(),
            fsl_command: args.fsl_command.clone(),
            overwrite: !args.no_overwrite,
        })
    }
}
