use ndarray::Array3;

/// A 4x4 voxel-to-world transform. The diagonal carries per-axis scale, the
/// last column per-axis translation; the bottom row is fixed to [0, 0, 0, 1].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Affine(pub [[f64; 4]; 4]);

impl Affine {
    pub fn identity() -> Self {
        let mut m = [[0.0; 4]; 4];
        for k in 0..4 {
            m[k][k] = 1.0;
        }
        Affine(m)
    }

    /// The three active diagonal scale terms.
    pub fn diagonal(&self) -> [f64; 3] {
        [self.0[0][0], self.0[1][1], self.0[2][2]]
    }

    /// The three translation terms (last column).
    pub fn translation(&self) -> [f64; 3] {
        [self.0[0][3], self.0[1][3], self.0[2][3]]
    }

    /// Map a voxel-grid coordinate to world coordinates.
    pub fn apply(&self, p: [f64; 3]) -> [f64; 3] {
        let mut out = [0.0; 3];
        for (k, row) in self.0.iter().take(3).enumerate() {
            out[k] = row[0] * p[0] + row[1] * p[1] + row[2] * p[2] + row[3];
        }
        out
    }
}

/// A single 3D image volume.
/// Voxel data is f32, indexed `[i, j, k]` with `i` along the x axis.
#[derive(Clone, Debug)]
pub struct Volume {
    /// Voxel data, shape = (nx, ny, nz)
    pub data: Array3<f32>,
    /// Voxel-to-world transform
    pub affine: Affine,
    /// Per-axis voxel spacing in mm
    pub spacing: [f32; 3],
}

impl Volume {
    pub fn new(data: Array3<f32>, affine: Affine, spacing: [f32; 3]) -> Self {
        Self {
            data,
            affine,
            spacing,
        }
    }

    /// Per-axis voxel counts (nx, ny, nz).
    pub fn shape(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    pub fn voxel_count(&self) -> usize {
        self.data.len()
    }
}
