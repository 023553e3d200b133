//! Quadrature rules for the one-dimensional reference interval `[-1, 1]`.

use crate::Rule;
use std::f64::consts::PI;

/// Evaluates the Legendre polynomial `P_n` and its derivative at `x`.
///
/// The value comes from the three-term recurrence
/// `m P_m(x) = (2m - 1) x P_{m-1}(x) - (m - 1) P_{m-2}(x)`, the derivative
/// from the identity `P_n'(x) = n (x P_n(x) - P_{n-1}(x)) / (x^2 - 1)`,
/// which is only defined on the open interval (-1, 1).
fn legendre_value_and_derivative(n: usize, x: f64) -> (f64, f64) {
    // current = P_m(x), previous = P_{m-1}(x)
    let mut current = 1.0;
    let mut previous = 0.0;
    for m in 1..=n {
        let m = m as f64;
        let next = ((2.0 * m - 1.0) * x * current - (m - 1.0) * previous) / m;
        previous = current;
        current = next;
    }
    let derivative = (n as f64) * (x * current - previous) / (x * x - 1.0);
    (current, derivative)
}

/// Gauss-Legendre quadrature for the reference interval `[-1, 1]`.
///
/// An `n`-point rule integrates polynomials of degree up to `2n - 1`
/// exactly. Nodes and weights are symmetric about the origin.
///
/// # Panics
///
/// Panics if zero points are requested.
pub fn gauss(num_points: usize) -> Rule<1> {
    let n = num_points;
    assert!(n > 0, "number of quadrature points must be positive");

    let mut weights = vec![0.0; n];
    let mut points = vec![[0.0]; n];

    // Polish the roots in one half of the interval with Newton's method,
    // starting from the Tricomi estimate, and mirror them onto the other
    // half. Once a root is known its weight follows in closed form.
    for i in 0..(n + 1) / 2 {
        let mut x = (PI * (i as f64 + 0.75) / (n as f64 + 0.5)).cos();
        let mut dp;
        loop {
            let (p, dp_new) = legendre_value_and_derivative(n, x);
            dp = dp_new;
            let step = p / dp;
            x -= step;
            if step.abs() <= 1e-15 {
                break;
            }
        }
        let w = 2.0 / ((1.0 - x * x) * dp * dp);

        points[i] = [x];
        weights[i] = w;
        points[n - 1 - i] = [-x];
        weights[n - 1 - i] = w;
    }

    (weights, points)
}
