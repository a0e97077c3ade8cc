use std::fs;
use std::io::Cursor;
use std::path::Path;

use flate2::read::GzDecoder;
use ndarray::{Array3, Axis, Ix3, Ix4};
use nifti::volume::ndarray::IntoNdArray;
use nifti::{InMemNiftiObject, NiftiHeader, NiftiObject};

use crate::error::{Result, VoxcomError};
use crate::volume::{Affine, Volume};

/// Gzip magic bytes at the start of a `.nii.gz` stream.
fn is_gzip(bytes: &[u8]) -> bool {
    bytes.len() >= 2 && bytes[0] == 0x1f && bytes[1] == 0x8b
}

/// Read a `.nii` or `.nii.gz` volume from disk.
///
/// Compression is detected from the stream, not the file name. Volumes must
/// be at least 3D; a 4D volume yields its first timepoint.
pub fn read_volume(path: &Path) -> Result<Volume> {
    let bytes = fs::read(path)?;

    let obj: InMemNiftiObject = if is_gzip(&bytes) {
        InMemNiftiObject::from_reader(GzDecoder::new(Cursor::new(&bytes[..])))?
    } else {
        InMemNiftiObject::from_reader(Cursor::new(&bytes[..]))?
    };

    let header = obj.header();
    let ndim = header.dim[0] as usize;
    if ndim < 3 {
        return Err(VoxcomError::InvalidVolume(format!(
            "expected a 3D volume, got {ndim}D: {}",
            path.display()
        )));
    }

    let spacing = [header.pixdim[1], header.pixdim[2], header.pixdim[3]];
    let affine = affine_from_header(header);

    let array = obj.into_volume().into_ndarray::<f32>()?;
    let data: Array3<f32> = match array.ndim() {
        3 => array
            .into_dimensionality::<Ix3>()
            .map_err(|e| VoxcomError::InvalidVolume(e.to_string()))?,
        4 => array
            .into_dimensionality::<Ix4>()
            .map_err(|e| VoxcomError::InvalidVolume(e.to_string()))?
            .index_axis_move(Axis(3), 0),
        n => {
            return Err(VoxcomError::InvalidVolume(format!(
                "unsupported {n}D volume: {}",
                path.display()
            )))
        }
    };

    Ok(Volume::new(data, affine, spacing))
}

/// Extract the voxel-to-world transform from a NIfTI header.
///
/// Prefers the sform rows when `sform_code > 0`; otherwise falls back to a
/// diagonal built from the voxel spacing.
fn affine_from_header(header: &NiftiHeader) -> Affine {
    if header.sform_code > 0 {
        let x = &header.srow_x;
        let y = &header.srow_y;
        let z = &header.srow_z;
        Affine([
            [x[0] as f64, x[1] as f64, x[2] as f64, x[3] as f64],
            [y[0] as f64, y[1] as f64, y[2] as f64, y[3] as f64],
            [z[0] as f64, z[1] as f64, z[2] as f64, z[3] as f64],
            [0.0, 0.0, 0.0, 1.0],
        ])
    } else {
        let mut m = Affine::identity();
        for k in 0..3 {
            m.0[k][k] = header.pixdim[k + 1] as f64;
        }
        m
    }
}
