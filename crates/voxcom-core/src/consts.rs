/// Default distance from the coordinate origin (in the units of the chosen
/// coordinate space) above which a volume is flagged as off center.
pub const DEFAULT_THRESHOLD: f64 = 20.0;

/// Minimum voxel count to use slice-level Rayon parallelism in the native
/// center-of-mass reduction.
pub const PARALLEL_VOXEL_THRESHOLD: usize = 262_144;

/// Suffix inserted before the volume extension for re-centered copies.
pub const CENTERED_SUFFIX: &str = "_centered";
