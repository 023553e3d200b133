//! Quadrature rules for the reference domains used by `yggdrasil`.
//!
//! Rules are plain `f64` weight/point pairs so that they can be used
//! independently of the main crate; `yggdrasil` converts them to its own
//! scalar type where needed.

pub mod tensor;
pub mod univariate;

/// A D-dimensional point.
pub type Point<const D: usize> = [f64; D];

/// A one-dimensional point.
pub type Point1 = Point<1>;

/// A two-dimensional point.
pub type Point2 = Point<2>;

/// A D-dimensional quadrature rule, as parallel weight and point arrays.
pub type Rule<const D: usize> = (Vec<f64>, Vec<Point<D>>);

/// A one-dimensional quadrature rule.
pub type Rule1d = Rule<1>;

/// A two-dimensional quadrature rule.
pub type Rule2d = Rule<2>;
