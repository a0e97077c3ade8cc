mod common;

use std::path::PathBuf;

use approx::assert_abs_diff_eq;
use voxcom_core::check::{CenterCheck, CentroidFlag, CheckOutcome};
use voxcom_core::consts::DEFAULT_THRESHOLD;
use voxcom_core::io::nifti::read_volume;
use voxcom_core::mass::native::center_of_mass;
use voxcom_core::mass::{CoordSpace, FslStats, MassSource};

use common::{build_synthetic_nifti, diag_affine, identity_affine, sparse_voxels, write_temp};

#[test]
fn test_voxel_space_single_voxel() {
    let dims = (8, 8, 8);
    let voxels = sparse_voxels(dims, &[((2, 3, 4), 1.0)]);
    let bytes = build_synthetic_nifti(dims, [1.0, 1.0, 1.0], identity_affine(), 1, &voxels);
    let file = write_temp(&bytes);

    let volume = read_volume(file.path()).unwrap();
    let com = center_of_mass(&volume, CoordSpace::Voxel);
    assert_abs_diff_eq!(com[0], 2.0, epsilon = 1e-9);
    assert_abs_diff_eq!(com[1], 3.0, epsilon = 1e-9);
    assert_abs_diff_eq!(com[2], 4.0, epsilon = 1e-9);
}

#[test]
fn test_intensity_weighting() {
    let dims = (8, 4, 4);
    // Weight 3 at x=4 vs weight 1 at x=0 pulls the centroid to x=3.
    let voxels = sparse_voxels(dims, &[((0, 0, 0), 1.0), ((4, 0, 0), 3.0)]);
    let bytes = build_synthetic_nifti(dims, [1.0, 1.0, 1.0], identity_affine(), 1, &voxels);
    let file = write_temp(&bytes);

    let volume = read_volume(file.path()).unwrap();
    let com = center_of_mass(&volume, CoordSpace::Voxel);
    assert_abs_diff_eq!(com[0], 3.0, epsilon = 1e-9);
    assert_abs_diff_eq!(com[1], 0.0, epsilon = 1e-9);
    assert_abs_diff_eq!(com[2], 0.0, epsilon = 1e-9);
}

#[test]
fn test_mm_space_applies_affine() {
    let dims = (8, 8, 8);
    let voxels = sparse_voxels(dims, &[((5, 5, 5), 1.0)]);
    let affine = diag_affine([2.0, 2.0, 2.0], [-10.0, -10.0, -10.0]);
    let bytes = build_synthetic_nifti(dims, [2.0, 2.0, 2.0], affine, 1, &voxels);
    let file = write_temp(&bytes);

    let volume = read_volume(file.path()).unwrap();
    let com = center_of_mass(&volume, CoordSpace::Mm);
    assert_abs_diff_eq!(com[0], 0.0, epsilon = 1e-6);
    assert_abs_diff_eq!(com[1], 0.0, epsilon = 1e-6);
    assert_abs_diff_eq!(com[2], 0.0, epsilon = 1e-6);
}

#[test]
fn test_non_positive_voxels_carry_no_weight() {
    let dims = (6, 6, 6);
    let voxels = sparse_voxels(dims, &[((1, 1, 1), -5.0), ((3, 3, 3), 2.0)]);
    let bytes = build_synthetic_nifti(dims, [1.0, 1.0, 1.0], identity_affine(), 1, &voxels);
    let file = write_temp(&bytes);

    let volume = read_volume(file.path()).unwrap();
    let com = center_of_mass(&volume, CoordSpace::Voxel);
    assert_abs_diff_eq!(com[0], 3.0, epsilon = 1e-9);
}

#[test]
fn test_all_dark_falls_back_to_geometric_center() {
    let dims = (4, 6, 8);
    let voxels = vec![0.0f32; 4 * 6 * 8];
    let bytes = build_synthetic_nifti(dims, [1.0, 1.0, 1.0], identity_affine(), 1, &voxels);
    let file = write_temp(&bytes);

    let volume = read_volume(file.path()).unwrap();
    let com = center_of_mass(&volume, CoordSpace::Voxel);
    assert_abs_diff_eq!(com[0], 2.0);
    assert_abs_diff_eq!(com[1], 3.0);
    assert_abs_diff_eq!(com[2], 4.0);
}

#[test]
fn test_known_centroid_and_distance() {
    // Two equal-weight voxels averaging to (10.5, 4, 13) under an identity
    // transform: distance = sqrt(10.5^2 + 4^2 + 13^2) = 17.1828...
    let dims = (16, 16, 16);
    let voxels = sparse_voxels(dims, &[((10, 4, 13), 1.0), ((11, 4, 13), 1.0)]);
    let bytes = build_synthetic_nifti(dims, [1.0, 1.0, 1.0], identity_affine(), 1, &voxels);
    let file = write_temp(&bytes);

    let check = CenterCheck::new(MassSource::Native, CoordSpace::Mm, DEFAULT_THRESHOLD);
    match check.run(file.path()) {
        CheckOutcome::Measured(centroid) => {
            assert_abs_diff_eq!(centroid.coords[0], 10.5, epsilon = 1e-4);
            assert_abs_diff_eq!(centroid.coords[1], 4.0, epsilon = 1e-4);
            assert_abs_diff_eq!(centroid.coords[2], 13.0, epsilon = 1e-4);
            assert_abs_diff_eq!(centroid.distance, 17.1828, epsilon = 1e-4);
            assert_eq!(centroid.flag, CentroidFlag::Centered);
        }
        CheckOutcome::Failed { detail } => panic!("measurement failed: {detail}"),
    }
}

#[test]
fn test_threshold_boundary_is_strict() {
    // Single voxel at (3, 4, 0): distance is exactly 5.
    let dims = (8, 8, 8);
    let voxels = sparse_voxels(dims, &[((3, 4, 0), 1.0)]);
    let bytes = build_synthetic_nifti(dims, [1.0, 1.0, 1.0], identity_affine(), 1, &voxels);
    let file = write_temp(&bytes);

    let at_threshold = CenterCheck::new(MassSource::Native, CoordSpace::Mm, 5.0);
    match at_threshold.run(file.path()) {
        CheckOutcome::Measured(centroid) => {
            assert_eq!(centroid.flag, CentroidFlag::Centered);
        }
        CheckOutcome::Failed { detail } => panic!("measurement failed: {detail}"),
    }

    let below_threshold = CenterCheck::new(MassSource::Native, CoordSpace::Mm, 5.0 - 1e-9);
    match below_threshold.run(file.path()) {
        CheckOutcome::Measured(centroid) => {
            assert_eq!(centroid.flag, CentroidFlag::OffCenter);
            assert_eq!(centroid.flag.label(), "!off center");
        }
        CheckOutcome::Failed { detail } => panic!("measurement failed: {detail}"),
    }
}

#[test]
fn test_missing_stats_command_becomes_failed_outcome() {
    let source = MassSource::Fsl(FslStats {
        command: PathBuf::from("voxcom-test-no-such-command"),
    });
    let check = CenterCheck::new(source, CoordSpace::Mm, DEFAULT_THRESHOLD);
    let outcome = check.run(std::path::Path::new("whatever.nii"));

    match &outcome {
        CheckOutcome::Failed { detail } => assert!(!detail.is_empty()),
        CheckOutcome::Measured(_) => panic!("expected a failed outcome"),
    }
    assert_eq!(
        outcome.fields(),
        ["na", "na", "na", "na", "FAILED"].map(String::from)
    );
}

#[test]
fn test_measured_fields_render() {
    let dims = (8, 8, 8);
    let voxels = sparse_voxels(dims, &[((1, 2, 3), 1.0)]);
    let bytes = build_synthetic_nifti(dims, [1.0, 1.0, 1.0], identity_affine(), 1, &voxels);
    let file = write_temp(&bytes);

    let check = CenterCheck::new(MassSource::Native, CoordSpace::Voxel, DEFAULT_THRESHOLD);
    let fields = check.run(file.path()).fields();
    assert_eq!(fields[0], "1");
    assert_eq!(fields[1], "2");
    assert_eq!(fields[2], "3");
    assert_eq!(fields[4], "");
}
