#![allow(dead_code)]

use std::io::Write;

pub const NIFTI_HEADER_SIZE: usize = 348;

/// Build a single-file NIfTI-1 image in memory.
///
/// `affine` holds the three active sform rows; `voxels` is float32 data with
/// x varying fastest (index = i + j*nx + k*nx*ny). Pass `sform_code = 0` to
/// exercise the pixdim-diagonal fallback.
pub fn build_synthetic_nifti(
    dims: (usize, usize, usize),
    spacing: [f32; 3],
    affine: [[f64; 4]; 3],
    sform_code: i16,
    voxels: &[f32],
) -> Vec<u8> {
    let (nx, ny, nz) = dims;
    assert_eq!(voxels.len(), nx * ny * nz);

    let mut header = [0u8; NIFTI_HEADER_SIZE];

    // sizeof_hdr at offset 0
    header[0..4].copy_from_slice(&348i32.to_le_bytes());
    // dim[8] at offset 40
    let dim: [i16; 8] = [3, nx as i16, ny as i16, nz as i16, 1, 1, 1, 1];
    for (i, d) in dim.iter().enumerate() {
        let offset = 40 + i * 2;
        header[offset..offset + 2].copy_from_slice(&d.to_le_bytes());
    }
    // datatype = FLOAT32 at offset 70, bitpix at 72
    header[70..72].copy_from_slice(&16i16.to_le_bytes());
    header[72..74].copy_from_slice(&32i16.to_le_bytes());
    // pixdim[8] at offset 76
    let pixdim: [f32; 8] = [1.0, spacing[0], spacing[1], spacing[2], 1.0, 1.0, 1.0, 1.0];
    for (i, p) in pixdim.iter().enumerate() {
        let offset = 76 + i * 4;
        header[offset..offset + 4].copy_from_slice(&p.to_le_bytes());
    }
    // vox_offset at 108
    header[108..112].copy_from_slice(&352.0f32.to_le_bytes());
    // scl_slope at 112, scl_inter at 116
    header[112..116].copy_from_slice(&1.0f32.to_le_bytes());
    header[116..120].copy_from_slice(&0.0f32.to_le_bytes());
    // sform_code at 254
    header[254..256].copy_from_slice(&sform_code.to_le_bytes());
    // srow_x at 280, srow_y at 296, srow_z at 312
    for (r, row) in affine.iter().enumerate() {
        for (c, v) in row.iter().enumerate() {
            let offset = 280 + r * 16 + c * 4;
            header[offset..offset + 4].copy_from_slice(&(*v as f32).to_le_bytes());
        }
    }
    // magic at 344
    header[344..348].copy_from_slice(b"n+1\0");

    let mut buf = Vec::with_capacity(NIFTI_HEADER_SIZE + 4 + voxels.len() * 4);
    buf.extend_from_slice(&header);
    // Extension indicator
    buf.extend_from_slice(&[0u8; 4]);
    for v in voxels {
        buf.extend_from_slice(&v.to_le_bytes());
    }
    buf
}

/// Identity sform rows.
pub fn identity_affine() -> [[f64; 4]; 3] {
    [
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
    ]
}

/// Diagonal sform rows with per-axis translation.
pub fn diag_affine(diag: [f64; 3], trans: [f64; 3]) -> [[f64; 4]; 3] {
    [
        [diag[0], 0.0, 0.0, trans[0]],
        [0.0, diag[1], 0.0, trans[1]],
        [0.0, 0.0, diag[2], trans[2]],
    ]
}

/// All-zero voxel data with a few voxels set.
pub fn sparse_voxels(
    dims: (usize, usize, usize),
    points: &[((usize, usize, usize), f32)],
) -> Vec<f32> {
    let (nx, ny, _) = dims;
    let mut voxels = vec![0.0f32; dims.0 * dims.1 * dims.2];
    for ((i, j, k), value) in points {
        voxels[i + j * nx + k * nx * ny] = *value;
    }
    voxels
}

/// Gzip-compress a byte buffer.
pub fn gzip(bytes: &[u8]) -> Vec<u8> {
    let mut encoder =
        flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(bytes).expect("gzip write");
    encoder.finish().expect("gzip finish")
}

/// Write a buffer to a temp file and return the handle.
///
/// The file stays alive as long as the returned `NamedTempFile` is not
/// dropped.
pub fn write_temp(data: &[u8]) -> tempfile::NamedTempFile {
    let mut f = tempfile::NamedTempFile::new().expect("create temp file");
    f.write_all(data).expect("write volume data");
    f.flush().expect("flush");
    f
}
