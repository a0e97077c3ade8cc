//! In-process intensity-weighted center of mass.
//!
//! Matches the contract of `fslstats -c`/`-C`: voxel values are the weights,
//! summed over the whole grid. Naturally sub-voxel; O(n) over the data.

use rayon::prelude::*;

use crate::consts::PARALLEL_VOXEL_THRESHOLD;
use crate::mass::CoordSpace;
use crate::volume::Volume;

/// Compute the center of mass of a volume.
///
/// Non-positive voxels carry no weight. A volume with no positive voxels
/// falls back to the geometric center of the grid.
pub fn center_of_mass(volume: &Volume, space: CoordSpace) -> [f64; 3] {
    let com = centroid_index(volume);
    match space {
        CoordSpace::Voxel => com,
        CoordSpace::Mm => volume.affine.apply(com),
    }
}

/// Voxel-space centroid of the intensity distribution.
fn centroid_index(volume: &Volume) -> [f64; 3] {
    let (nx, ny, nz) = volume.shape();

    let (sum_i, sum_j, sum_k, sum_w) = if volume.voxel_count() >= PARALLEL_VOXEL_THRESHOLD {
        slice_sums_parallel(volume, nx, ny, nz)
    } else {
        slice_sums_sequential(volume, nx, ny, nz)
    };

    if sum_w > 0.0 {
        [sum_i / sum_w, sum_j / sum_w, sum_k / sum_w]
    } else {
        // All-dark volume: fall back to the geometric center.
        [nx as f64 / 2.0, ny as f64 / 2.0, nz as f64 / 2.0]
    }
}

/// Slice-parallel moment summation using Rayon.
fn slice_sums_parallel(
    volume: &Volume,
    nx: usize,
    ny: usize,
    nz: usize,
) -> (f64, f64, f64, f64) {
    (0..nz)
        .into_par_iter()
        .map(|k| {
            let mut sums = (0.0f64, 0.0f64, 0.0f64, 0.0f64);
            accumulate_slice(volume, nx, ny, k, &mut sums);
            sums
        })
        .reduce(
            || (0.0, 0.0, 0.0, 0.0),
            |(ai, aj, ak, aw), (i, j, k, w)| (ai + i, aj + j, ak + k, aw + w),
        )
}

/// Sequential moment summation using nested loops.
fn slice_sums_sequential(
    volume: &Volume,
    nx: usize,
    ny: usize,
    nz: usize,
) -> (f64, f64, f64, f64) {
    let mut sums = (0.0f64, 0.0f64, 0.0f64, 0.0f64);
    for k in 0..nz {
        accumulate_slice(volume, nx, ny, k, &mut sums);
    }
    sums
}

fn accumulate_slice(
    volume: &Volume,
    nx: usize,
    ny: usize,
    k: usize,
    sums: &mut (f64, f64, f64, f64),
) {
    for j in 0..ny {
        for i in 0..nx {
            let val = volume.data[[i, j, k]];
            if val > 0.0 {
                let weight = val as f64;
                sums.0 += i as f64 * weight;
                sums.1 += j as f64 * weight;
                sums.2 += k as f64 * weight;
                sums.3 += weight;
            }
        }
    }
}
