use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use voxcom_core::io::nifti::read_volume;

#[derive(Args)]
pub struct InfoArgs {
    /// Input NIfTI file (.nii or .nii.gz)
    pub file: PathBuf,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let volume = read_volume(&args.file)?;
    let (nx, ny, nz) = volume.shape();

    println!("File:        {}", args.file.display());
    println!("Dimensions:  {}x{}x{}", nx, ny, nz);
    println!(
        "Spacing:     {} x {} x {} mm",
        volume.spacing[0], volume.spacing[1], volume.spacing[2]
    );
    println!("Affine:");
    for row in &volume.affine.0 {
        println!(
            "  [{:>10.4} {:>10.4} {:>10.4} {:>10.4}]",
            row[0], row[1], row[2], row[3]
        );
    }

    let total_mb = (volume.voxel_count() * 4) as f64 / (1024.0 * 1024.0);
    println!("Data size:   {:.1} MB", total_mb);

    Ok(())
}
