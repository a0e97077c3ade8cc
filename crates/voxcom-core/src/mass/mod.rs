//! Center-of-mass measurement.
//!
//! Two interchangeable sources compute the intensity-weighted centroid of a
//! volume file: the external `fslstats` tool, and a native in-process
//! reduction. Both report either voxel-grid or world (mm) coordinates.

pub mod fsl;
pub mod native;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::io::nifti::read_volume;

pub use fsl::FslStats;

/// Coordinate space in which a center of mass is reported.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoordSpace {
    /// World coordinates in mm (fslstats `-c`).
    #[default]
    Mm,
    /// Voxel-grid indices (fslstats `-C`).
    Voxel,
}

impl CoordSpace {
    /// The fslstats operation flag for this space.
    pub fn stats_flag(&self) -> &'static str {
        match self {
            CoordSpace::Mm => "-c",
            CoordSpace::Voxel => "-C",
        }
    }
}

/// Where center-of-mass measurements come from.
#[derive(Clone, Debug)]
pub enum MassSource {
    /// In-process reduction over the decoded volume.
    Native,
    /// External fslstats invocation.
    Fsl(FslStats),
}

impl MassSource {
    /// Measure the center of mass of the volume at `path`.
    pub fn measure(&self, path: &Path, space: CoordSpace) -> Result<[f64; 3]> {
        match self {
            MassSource::Native => {
                let volume = read_volume(path)?;
                Ok(native::center_of_mass(&volume, space))
            }
            MassSource::Fsl(fsl) => fsl.center_of_mass(path, space),
        }
    }
}
