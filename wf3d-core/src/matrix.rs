/// General matrix multiply and dot product with shape checking
use nalgebra::{DMatrix, Matrix4, Vector4};

use crate::error::{Result, Wf3dError};

/// Multiply an (m x n) matrix by an (n x p) matrix.
///
/// Fails with [`Wf3dError::Dimension`] when the column count of `a` is not
/// the row count of `b`.
pub fn multiply(a: &DMatrix<f64>, b: &DMatrix<f64>) -> Result<DMatrix<f64>> {
    if a.ncols() != b.nrows() {
        return Err(Wf3dError::dimension(
            "matrix multiply",
            format!("{}x{}", a.nrows(), a.ncols()),
            format!("{}x{}", b.nrows(), b.ncols()),
        ));
    }

    // Summed in the same order as `dot`, so both give bit-identical results
    let mut out = DMatrix::zeros(a.nrows(), b.ncols());
    for r in 0..a.nrows() {
        for c in 0..b.ncols() {
            let mut sum = 0.0;
            for i in 0..a.ncols() {
                sum += a[(r, i)] * b[(i, c)];
            }
            out[(r, c)] = sum;
        }
    }
    Ok(out)
}

/// Dot product of two equally long vectors
pub fn dot(a: &[f64], b: &[f64]) -> Result<f64> {
    if a.len() != b.len() {
        return Err(Wf3dError::dimension(
            "dot product",
            format!("length {}", a.len()),
            format!("length {}", b.len()),
        ));
    }
    Ok(a.iter().zip(b).map(|(x, y)| x * y).sum())
}

/// Widen a fixed 4x4 matrix into a dynamically sized one
pub fn to_dynamic(m: &Matrix4<f64>) -> DMatrix<f64> {
    DMatrix::from_fn(4, 4, |r, c| m[(r, c)])
}

/// A homogeneous point as a 4x1 column matrix
pub fn column(v: &Vector4<f64>) -> DMatrix<f64> {
    DMatrix::from_column_slice(4, 1, v.as_slice())
}
