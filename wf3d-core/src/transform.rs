/// Composable affine transforms
use nalgebra::{Matrix4, Point3, Vector4};

use crate::error::Result;
use crate::matrix::dot;

/// Translation matrix
pub fn translation_matrix(dx: f64, dy: f64, dz: f64) -> Matrix4<f64> {
    Matrix4::new(
        1.0, 0.0, 0.0, dx, //
        0.0, 1.0, 0.0, dy, //
        0.0, 0.0, 1.0, dz, //
        0.0, 0.0, 0.0, 1.0,
    )
}

/// Rotation about the X axis, theta in radians
pub fn rotation_x_matrix(theta: f64) -> Matrix4<f64> {
    let (s, c) = theta.sin_cos();
    Matrix4::new(
        1.0, 0.0, 0.0, 0.0, //
        0.0, c, -s, 0.0, //
        0.0, s, c, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    )
}

/// Rotation about the Y axis, theta in radians
pub fn rotation_y_matrix(theta: f64) -> Matrix4<f64> {
    let (s, c) = theta.sin_cos();
    Matrix4::new(
        c, 0.0, s, 0.0, //
        0.0, 1.0, 0.0, 0.0, //
        -s, 0.0, c, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    )
}

/// Rotation about the Z axis, theta in radians
pub fn rotation_z_matrix(theta: f64) -> Matrix4<f64> {
    let (s, c) = theta.sin_cos();
    Matrix4::new(
        c, -s, 0.0, 0.0, //
        s, c, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    )
}

/// Non-uniform scale, `diag(sx, sy, sz, 1)`
pub fn scale_matrix(sx: f64, sy: f64, sz: f64) -> Matrix4<f64> {
    Matrix4::new(
        sx, 0.0, 0.0, 0.0, //
        0.0, sy, 0.0, 0.0, //
        0.0, 0.0, sz, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    )
}

/// An accumulated affine transform.
///
/// Every operation right-multiplies: `current = current * op`. The operation
/// composed last is therefore the first one applied to a vertex. Calling
/// `translate` then `rotate_z` rotates the vertex and then translates it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    matrix: Matrix4<f64>,
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    pub fn from_matrix(matrix: Matrix4<f64>) -> Self {
        Self { matrix }
    }

    pub fn matrix(&self) -> &Matrix4<f64> {
        &self.matrix
    }

    /// Back to the identity
    pub fn reset(&mut self) -> &mut Self {
        self.matrix = Matrix4::identity();
        self
    }

    /// Right-multiply by an arbitrary matrix.
    ///
    /// A product with a NaN or infinite entry is dropped with a warning and
    /// the transform stays as it was, so the bottom row remains `[0, 0, 0, 1]`.
    pub fn compose(&mut self, op: &Matrix4<f64>) -> &mut Self {
        let next = self.matrix * op;
        if next.iter().all(|v| v.is_finite()) {
            self.matrix = next;
        } else {
            log::warn!("ignoring transform that leaves the matrix non-finite");
        }
        self
    }

    pub fn translate(&mut self, dx: f64, dy: f64, dz: f64) -> &mut Self {
        self.compose(&translation_matrix(dx, dy, dz))
    }

    pub fn rotate_x(&mut self, theta: f64) -> &mut Self {
        self.compose(&rotation_x_matrix(theta))
    }

    pub fn rotate_y(&mut self, theta: f64) -> &mut Self {
        self.compose(&rotation_y_matrix(theta))
    }

    pub fn rotate_z(&mut self, theta: f64) -> &mut Self {
        self.compose(&rotation_z_matrix(theta))
    }

    pub fn scale(&mut self, sx: f64, sy: f64, sz: f64) -> &mut Self {
        self.compose(&scale_matrix(sx, sy, sz))
    }

    /// Transform one point: each output component is the dot product of a
    /// matrix row with `[x, y, z, 1]`.
    pub fn transform_point(&self, point: &Point3<f64>) -> Result<Vector4<f64>> {
        let homogeneous = point.to_homogeneous();
        let mut out = Vector4::zeros();
        for r in 0..4 {
            let row = self.matrix.row(r).transpose();
            out[r] = dot(row.as_slice(), homogeneous.as_slice())?;
        }
        Ok(out)
    }

    /// Transform a vertex set into `out`, overwriting its previous contents.
    pub fn transform(&self, vertices: &[Point3<f64>], out: &mut Vec<Vector4<f64>>) -> Result<()> {
        out.clear();
        out.reserve(vertices.len());
        for vertex in vertices {
            out.push(self.transform_point(vertex)?);
        }
        Ok(())
    }

    /// The sixteen entries row by row, for GL-style consumers
    pub fn to_row_major_array(&self) -> [f64; 16] {
        let mut out = [0.0; 16];
        for r in 0..4 {
            for c in 0..4 {
                out[r * 4 + c] = self.matrix[(r, c)];
            }
        }
        out
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}
