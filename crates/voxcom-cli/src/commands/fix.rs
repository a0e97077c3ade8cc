use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use voxcom_core::mass::{FslStats, MassSource};
use voxcom_core::recenter::Recenter;

use super::check::SourceArg;

#[derive(Args)]
pub struct FixArgs {
    /// Input NIfTI file (.nii or .nii.gz)
    pub input: PathBuf,

    /// Destination for the re-centered copy; defaults to
    /// <input>_centered next to the source
    #[arg(short, long, conflicts_with = "apply_to")]
    pub output: Option<PathBuf>,

    /// Manifest of volumes sharing the input's grid; each gets a copy
    /// carrying the transform computed from the input
    #[arg(long)]
    pub apply_to: Option<PathBuf>,

    /// Center-of-mass source for the refinement measurement
    #[arg(long, value_enum, default_value = "fslstats")]
    pub source: SourceArg,

    /// fslstats executable to invoke
    #[arg(long, default_value = "fslstats")]
    pub fsl_command: PathBuf,
}

pub fn run(args: &FixArgs) -> Result<()> {
    let mass = match args.source {
        SourceArg::Native => MassSource::Native,
        SourceArg::Fslstats => MassSource::Fsl(FslStats {
            command: args.fsl_command.clone(),
        }),
    };
    let recenter = Recenter::open(&args.input, mass)
        .with_context(|| format!("Failed to load {}", args.input.display()))?;

    if let Some(ref manifest) = args.apply_to {
        let contents = std::fs::read_to_string(manifest)
            .with_context(|| format!("Failed to read manifest {}", manifest.display()))?;
        let files: Vec<PathBuf> = contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(PathBuf::from)
            .collect();

        let written = recenter.fix_batch(&files)?;
        for (source, destination) in files.iter().zip(&written) {
            println!("{} -> {}", source.display(), destination.display());
        }
        println!("Re-centered {} volume(s)", written.len());
    } else {
        let destination = recenter.fix(args.output.as_deref())?;
        println!("Centered copy saved to {}", destination.display());
    }

    Ok(())
}
