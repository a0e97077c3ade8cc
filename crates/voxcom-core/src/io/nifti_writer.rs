use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use byteorder::{LittleEndian, WriteBytesExt};
use flate2::write::GzEncoder;
use flate2::Compression;
use ndarray::Array3;

use crate::error::Result;
use crate::volume::Affine;

pub const NIFTI_HEADER_SIZE: usize = 348;
const NIFTI_MAGIC: &[u8; 4] = b"n+1\0";
const DT_FLOAT32: i16 = 16;
const UNITS_MM: u8 = 2;

/// Write a volume as a single-file NIfTI-1 image.
///
/// Voxel data is stored as little-endian float32 with x varying fastest. The
/// affine is written as the sform; output is gzip-compressed when the
/// destination ends in `.gz`.
pub fn write_volume(
    path: &Path,
    data: &Array3<f32>,
    spacing: [f32; 3],
    affine: &Affine,
) -> Result<()> {
    let file = File::create(path)?;
    if path.to_string_lossy().ends_with(".gz") {
        let mut w = BufWriter::new(GzEncoder::new(file, Compression::default()));
        write_contents(&mut w, data, spacing, affine)?;
        w.into_inner().map_err(|e| e.into_error())?.finish()?;
    } else {
        let mut w = BufWriter::new(file);
        write_contents(&mut w, data, spacing, affine)?;
        w.flush()?;
    }
    Ok(())
}

fn write_contents<W: Write>(
    w: &mut W,
    data: &Array3<f32>,
    spacing: [f32; 3],
    affine: &Affine,
) -> Result<()> {
    write_header(w, data.dim(), spacing, affine)?;
    // Extension indicator: four zero bytes, no extensions follow.
    w.write_all(&[0u8; 4])?;

    let (nx, ny, nz) = data.dim();
    for k in 0..nz {
        for j in 0..ny {
            for i in 0..nx {
                w.write_f32::<LittleEndian>(data[[i, j, k]])?;
            }
        }
    }
    Ok(())
}

/// Emit the 348-byte NIfTI-1 header, field by field in file order.
fn write_header<W: Write>(
    w: &mut W,
    dim: (usize, usize, usize),
    spacing: [f32; 3],
    affine: &Affine,
) -> Result<()> {
    let (nx, ny, nz) = dim;

    // sizeof_hdr (4 bytes)
    w.write_i32::<LittleEndian>(348)?;
    // data_type (10) + db_name (18), unused legacy fields
    w.write_all(&[0u8; 10])?;
    w.write_all(&[0u8; 18])?;
    // extents (4), session_error (2), regular (1), dim_info (1)
    w.write_i32::<LittleEndian>(0)?;
    w.write_i16::<LittleEndian>(0)?;
    w.write_u8(b'r')?;
    w.write_u8(0)?;
    // dim[8] (16 bytes)
    for d in [3, nx as i16, ny as i16, nz as i16, 1, 1, 1, 1] {
        w.write_i16::<LittleEndian>(d)?;
    }
    // intent_p1..p3 (12), intent_code (2)
    for _ in 0..3 {
        w.write_f32::<LittleEndian>(0.0)?;
    }
    w.write_i16::<LittleEndian>(0)?;
    // datatype (2), bitpix (2), slice_start (2)
    w.write_i16::<LittleEndian>(DT_FLOAT32)?;
    w.write_i16::<LittleEndian>(32)?;
    w.write_i16::<LittleEndian>(0)?;
    // pixdim[8] (32 bytes); pixdim[0] is the qfac, left at 1
    for p in [1.0, spacing[0], spacing[1], spacing[2], 1.0, 1.0, 1.0, 1.0] {
        w.write_f32::<LittleEndian>(p)?;
    }
    // vox_offset (4): header + extension indicator
    w.write_f32::<LittleEndian>(352.0)?;
    // scl_slope (4), scl_inter (4)
    w.write_f32::<LittleEndian>(1.0)?;
    w.write_f32::<LittleEndian>(0.0)?;
    // slice_end (2), slice_code (1), xyzt_units (1)
    w.write_i16::<LittleEndian>(0)?;
    w.write_u8(0)?;
    w.write_u8(UNITS_MM)?;
    // cal_max, cal_min, slice_duration, toffset (16 bytes)
    for _ in 0..4 {
        w.write_f32::<LittleEndian>(0.0)?;
    }
    // glmax (4), glmin (4), unused legacy fields
    w.write_i32::<LittleEndian>(0)?;
    w.write_i32::<LittleEndian>(0)?;
    // descrip (80) + aux_file (24)
    w.write_all(&[0u8; 80])?;
    w.write_all(&[0u8; 24])?;
    // qform_code (2) = 0, sform_code (2) = 1
    w.write_i16::<LittleEndian>(0)?;
    w.write_i16::<LittleEndian>(1)?;
    // quatern_b/c/d + qoffset_x/y/z (24 bytes)
    for _ in 0..6 {
        w.write_f32::<LittleEndian>(0.0)?;
    }
    // srow_x, srow_y, srow_z (48 bytes)
    for row in &affine.0[..3] {
        for v in row {
            w.write_f32::<LittleEndian>(*v as f32)?;
        }
    }
    // intent_name (16)
    w.write_all(&[0u8; 16])?;
    // magic (4)
    w.write_all(NIFTI_MAGIC)?;

    debug_assert_eq!(
        4 + 10 + 18 + 4 + 2 + 1 + 1 + 16 + 12 + 2 + 2 + 2 + 2 + 32 + 4 + 4 + 4 + 2 + 1 + 1
            + 16 + 4 + 4 + 80 + 24 + 2 + 2 + 24 + 48 + 16 + 4,
        NIFTI_HEADER_SIZE
    );
    Ok(())
}
