//! The tensor-product bilinear Lagrange basis on the reference square.
//!
//! The reference cell is `[-1, 1]^2`. The four shape functions are products
//! of the two one-dimensional Lagrange nodal polynomials with nodes -1 and
//! 1; local basis index `lin` maps to the 1D factor indices as
//! `(lin / 2, lin % 2)`, so the local ordering matches the mesh corner
//! ordering (-,-), (-,+), (+,-), (+,+).

use nalgebra::{Matrix1x4, Matrix2x4, Point2, RealField, Vector2};
use numeric_literals::replace_float_literals;

/// Evaluates the `i`-th Lagrange nodal polynomial over `nodes` at `x`.
#[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
pub fn lagrange<T: RealField>(nodes: &[T], i: usize, x: T) -> T {
    let node = nodes[i].clone();
    let mut value = 1.0;
    for (j, other) in nodes.iter().enumerate() {
        if j != i {
            value *= (x.clone() - other.clone()) / (node.clone() - other.clone());
        }
    }
    value
}

/// Evaluates the derivative of the `i`-th Lagrange nodal polynomial over
/// `nodes` at `x`, via the product-rule expansion
/// `sum_{j != i} 1/(x_i - x_j) prod_{m != i,j} (x - x_m)/(x_i - x_m)`.
#[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
pub fn lagrange_derivative<T: RealField>(nodes: &[T], i: usize, x: T) -> T {
    let mut result = 0.0;
    for j in 0..nodes.len() {
        if j == i {
            continue;
        }
        let mut term = 1.0 / (nodes[i].clone() - nodes[j].clone());
        for (m, other) in nodes.iter().enumerate() {
            if m != i && m != j {
                term *= (x.clone() - other.clone()) / (nodes[i].clone() - other.clone());
            }
        }
        result += term;
    }
    result
}

/// The bilinear nodal basis on the reference square `[-1, 1]^2`.
#[derive(Debug, Clone, PartialEq)]
pub struct BilinearBasis<T: RealField> {
    nodes: [T; 2],
}

impl<T: RealField> BilinearBasis<T> {
    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    pub fn new() -> Self {
        Self { nodes: [-1.0, 1.0] }
    }

    /// Number of local shape functions.
    pub fn num_nodes(&self) -> usize {
        4
    }

    /// Splits a local basis index into its (x, y) 1D factor indices.
    pub fn linear_to_cartesian(lin: usize) -> (usize, usize) {
        debug_assert!(lin < 4);
        (lin / 2, lin % 2)
    }

    /// Value of shape function `lin` at reference coordinates `xi`.
    pub fn evaluate(&self, lin: usize, xi: &Point2<T>) -> T {
        let (i, j) = Self::linear_to_cartesian(lin);
        lagrange(&self.nodes, i, xi.x.clone()) * lagrange(&self.nodes, j, xi.y.clone())
    }

    /// Reference-space gradient of shape function `lin` at `xi`.
    ///
    /// The x-derivative differentiates the x factor and keeps the y factor,
    /// and symmetrically for the y-derivative.
    pub fn gradient(&self, lin: usize, xi: &Point2<T>) -> Vector2<T> {
        let (i, j) = Self::linear_to_cartesian(lin);
        Vector2::new(
            lagrange_derivative(&self.nodes, i, xi.x.clone()) * lagrange(&self.nodes, j, xi.y.clone()),
            lagrange(&self.nodes, i, xi.x.clone()) * lagrange_derivative(&self.nodes, j, xi.y.clone()),
        )
    }

    /// All four shape function values at `xi`, as a row vector.
    pub fn evaluate_basis(&self, xi: &Point2<T>) -> Matrix1x4<T> {
        Matrix1x4::from_fn(|_, lin| self.evaluate(lin, xi))
    }

    /// A matrix whose columns are the reference-space gradients of the four
    /// shape functions at `xi`.
    pub fn gradients(&self, xi: &Point2<T>) -> Matrix2x4<T> {
        Matrix2x4::from_columns(&[
            self.gradient(0, xi),
            self.gradient(1, xi),
            self.gradient(2, xi),
            self.gradient(3, xi),
        ])
    }
}

impl<T: RealField> Default for BilinearBasis<T> {
    fn default() -> Self {
        Self::new()
    }
}
