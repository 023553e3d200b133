//! Quadrature rules on the reference domains, generic over the scalar
//! type.
//!
//! The underlying rules are computed in `f64` by the
//! `yggdrasil-quadrature` crate and converted element-wise.

use nalgebra::{convert, Point1, Point2, RealField};

/// Parallel weight and point arrays of a quadrature rule.
pub type QuadraturePair<T, P> = (Vec<T>, Vec<P>);

/// A one-dimensional quadrature rule.
pub type QuadraturePair1d<T> = QuadraturePair<T, Point1<T>>;

/// A two-dimensional quadrature rule.
pub type QuadraturePair2d<T> = QuadraturePair<T, Point2<T>>;

/// Gauss-Legendre quadrature on the reference interval `[-1, 1]`.
pub fn gauss<T: RealField>(num_points: usize) -> QuadraturePair1d<T> {
    let (weights, points) = yggdrasil_quadrature::univariate::gauss(num_points);
    (
        weights.into_iter().map(convert).collect(),
        points.into_iter().map(|[x]| Point1::new(convert(x))).collect(),
    )
}

/// Tensor-product Gauss rule on the reference quadrilateral `[-1, 1]^2`.
pub fn quadrilateral_gauss<T: RealField>(num_points_per_dim: usize) -> QuadraturePair2d<T> {
    let (weights, points) = yggdrasil_quadrature::tensor::quadrilateral_gauss(num_points_per_dim);
    (
        weights.into_iter().map(convert).collect(),
        points
            .into_iter()
            .map(|[x, y]| Point2::new(convert(x), convert(y)))
            .collect(),
    )
}
