use nalgebra::{DMatrix, Point2};
use nalgebra_sparse::CscMatrix;

mod assembly;
mod geometry;

/// True on the boundary of the unit square, with a small tolerance.
pub fn on_unit_square_boundary(p: &Point2<f64>) -> bool {
    let eps = 1e-12;
    p.x < eps || p.x > 1.0 - eps || p.y < eps || p.y > 1.0 - eps
}

/// Expands a sparse matrix to dense, for small test systems.
pub fn to_dense(matrix: &CscMatrix<f64>) -> DMatrix<f64> {
    let mut dense = DMatrix::zeros(matrix.nrows(), matrix.ncols());
    for (i, j, v) in matrix.triplet_iter() {
        dense[(i, j)] += *v;
    }
    dense
}
