//! Tensor-product quadrature for the reference quadrilateral `[-1, 1]^2`.

use crate::univariate::gauss;
use crate::Rule;

/// A Gauss quadrature rule for the reference quadrilateral, constructed as
/// a tensor product of one-dimensional Gauss-Legendre rules with
/// `num_points_per_dim` points in each direction.
pub fn quadrilateral_gauss(num_points_per_dim: usize) -> Rule<2> {
    let n = num_points_per_dim;
    let (weights1d, points1d) = gauss(n);

    let mut weights = Vec::with_capacity(n * n);
    let mut points = Vec::with_capacity(n * n);
    for (&wx, &[x]) in weights1d.iter().zip(&points1d) {
        for (&wy, &[y]) in weights1d.iter().zip(&points1d) {
            weights.push(wx * wy);
            points.push([x, y]);
        }
    }

    (weights, points)
}
