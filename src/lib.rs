//! Quadtree meshes and bilinear finite element assembly.
//!
//! `yggdrasil` builds uniformly refined quadtree subdivisions of a square
//! domain, derives a globally consistent vertex numbering across all
//! refinement levels, and assembles the stiffness matrix and load vector of
//! a variable-coefficient Poisson-type problem with Dirichlet boundary
//! conditions, using a tensor-product bilinear basis and Gauss-Legendre
//! quadrature.
//!
//! The crate is deliberately sequential: a mesh is immutable once refined,
//! and every derived quantity is produced by a single deterministic pass,
//! so results are reproducible across runs. Solving the assembled system is
//! left to downstream code; the vertex/DOF maps exposed by
//! [`geometry::Geometry`] carry a solution vector back onto mesh vertices.
//!
//! A typical pipeline:
//!
//! ```
//! use yggdrasil::assembly::Discretization;
//! use yggdrasil::geometry::Geometry;
//! use yggdrasil::nalgebra::Point2;
//!
//! let on_boundary = |p: &Point2<f64>| {
//!     let eps = 1e-12;
//!     p.x < eps || p.x > 1.0 - eps || p.y < eps || p.y > 1.0 - eps
//! };
//! let geometry = Geometry::unit_square(3, on_boundary);
//! let discretization = Discretization::new(&geometry, 3, |_: &Point2<f64>| 1.0);
//!
//! let stiffness = discretization.assemble_stiffness();
//! let rhs = discretization.assemble_rhs();
//! assert_eq!(stiffness.nrows(), geometry.num_dofs_at_level(3));
//! assert_eq!(rhs.len(), stiffness.nrows());
//! ```

pub mod assembly;
pub mod element;
pub mod geometry;
pub mod mesh;
pub mod quadrature;

pub extern crate nalgebra;
pub extern crate nalgebra_sparse;
