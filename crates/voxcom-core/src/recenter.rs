//! Affine re-centering.
//!
//! Builds a replacement voxel-to-world transform that maps a volume's
//! intensity-weighted center of mass to the coordinate origin, and writes
//! copies carrying that transform. Voxel data is never modified.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::consts::CENTERED_SUFFIX;
use crate::error::Result;
use crate::io::nifti::read_volume;
use crate::io::nifti_writer::write_volume;
use crate::mass::{CoordSpace, MassSource};
use crate::volume::{Affine, Volume};

/// Re-centering engine for one primary volume.
pub struct Recenter {
    source_path: PathBuf,
    volume: Volume,
    mass: MassSource,
}

impl Recenter {
    /// Load the primary volume.
    pub fn open(path: &Path, mass: MassSource) -> Result<Self> {
        let volume = read_volume(path)?;
        Ok(Self {
            source_path: path.to_path_buf(),
            volume,
            mass,
        })
    }

    /// Transform that maps the mid-voxel of the grid toward the origin.
    ///
    /// The native transform's diagonal is copied through unchanged; each
    /// translation term has magnitude `dim/2` (integer mid-voxel) with its
    /// sign opposing the diagonal entry. A negative diagonal therefore gets
    /// a positive translation.
    pub fn nominal_transform(&self) -> Affine {
        let (nx, ny, nz) = self.volume.shape();
        let diag = self.volume.affine.diagonal();
        let mut out = Affine::identity();
        for (k, dim) in [nx, ny, nz].into_iter().enumerate() {
            out.0[k][k] = diag[k];
            out.0[k][3] = -diag[k].signum() * (dim / 2) as f64;
        }
        out
    }

    /// Transform that maps the intensity-weighted center of mass to the
    /// origin.
    ///
    /// The nominal transform only centers the voxel grid, not the mass of
    /// the image, so a provisional copy carrying the nominal transform is
    /// written and measured; the measured centroid is then subtracted from
    /// the nominal translation. The provisional copy lives in a temporary
    /// directory that is removed when this call returns.
    pub fn refined_transform(&self) -> Result<Affine> {
        let nominal = self.nominal_transform();

        let scratch = tempfile::tempdir()?;
        let provisional = scratch.path().join("provisional.nii.gz");
        write_volume(
            &provisional,
            &self.volume.data,
            self.volume.spacing,
            &nominal,
        )?;
        let centroid = self.mass.measure(&provisional, CoordSpace::Mm)?;

        let mut refined = nominal;
        for k in 0..3 {
            refined.0[k][3] -= centroid[k];
        }
        Ok(refined)
    }

    /// Write a re-centered copy of the primary volume and return its path.
    ///
    /// Without an explicit destination the copy lands next to the source as
    /// `<stem>_centered.<ext>`.
    pub fn fix(&self, destination: Option<&Path>) -> Result<PathBuf> {
        let destination = destination
            .map(Path::to_path_buf)
            .unwrap_or_else(|| centered_destination(&self.source_path));
        let refined = self.refined_transform()?;
        write_volume(
            &destination,
            &self.volume.data,
            self.volume.spacing,
            &refined,
        )?;
        info!(
            source = %self.source_path.display(),
            destination = %destination.display(),
            "wrote re-centered copy"
        );
        Ok(destination)
    }

    /// Re-center every listed file with the transform computed once from the
    /// primary volume, returning one destination per input.
    ///
    /// The listed files must share the primary volume's coordinate grid; the
    /// transform is not re-derived per file.
    pub fn fix_batch(&self, files: &[PathBuf]) -> Result<Vec<PathBuf>> {
        let refined = self.refined_transform()?;
        let mut written = Vec::with_capacity(files.len());
        for file in files {
            let volume = read_volume(file)?;
            let destination = centered_destination(file);
            write_volume(&destination, &volume.data, volume.spacing, &refined)?;
            info!(
                source = %file.display(),
                destination = %destination.display(),
                "wrote re-centered copy"
            );
            written.push(destination);
        }
        Ok(written)
    }
}

/// Derive the default destination for a re-centered copy.
pub fn centered_destination(path: &Path) -> PathBuf {
    let text = path.to_string_lossy();
    let ext = if text.ends_with(".nii.gz") {
        ".nii.gz"
    } else {
        ".nii"
    };
    match text.strip_suffix(ext) {
        Some(stem) => PathBuf::from(format!("{stem}{CENTERED_SUFFIX}{ext}")),
        None => PathBuf::from(format!("{text}{CENTERED_SUFFIX}{ext}")),
    }
}
