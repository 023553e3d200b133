//! Assembly of stiffness matrices and load vectors on quadtree geometries.
//!
//! [`Discretization`] combines a [`Geometry`], a refinement level and a
//! coefficient function into the sparse linear system of a
//! variable-coefficient Poisson problem, using the bilinear nodal basis
//! and 2x2 Gauss-Legendre quadrature. Rows and columns of Dirichlet
//! vertices are omitted from the assembled operator entirely, so the
//! system is indexed by data (unknown) indices; prescribed boundary values
//! are applied by the caller, either through
//! [`assemble_dirichlet_lifting`](Discretization::assemble_dirichlet_lifting)
//! when solving or through
//! [`evaluate_solution`](Discretization::evaluate_solution) when sampling
//! the field.

use crate::element::BilinearBasis;
use crate::geometry::Geometry;
use crate::mesh::CellIndex;
use crate::quadrature::{quadrilateral_gauss, QuadraturePair2d};
use itertools::izip;
use log::debug;
use nalgebra::{DVector, Point2, RealField};
use nalgebra_sparse::{CooMatrix, CscMatrix};
use numeric_literals::replace_float_literals;

/// One-shot assembler for a fixed (geometry, level, coefficient) triple.
///
/// The coefficient is treated as piecewise constant per cell and evaluated
/// at cell centers. Beyond the cached quadrature rule and basis the
/// assembler holds no state; each `assemble_*` call walks the cells of the
/// target level once.
pub struct Discretization<'a, T: RealField, F> {
    geometry: &'a Geometry<T>,
    level: usize,
    coefficient: F,
    basis: BilinearBasis<T>,
    quadrature: QuadraturePair2d<T>,
    num_dofs: usize,
}

impl<'a, T, F> Discretization<'a, T, F>
where
    T: RealField,
    F: Fn(&Point2<T>) -> T,
{
    /// Creates an assembler for the cells at `level`.
    ///
    /// # Panics
    ///
    /// Panics if the geometry has not been refined to `level`.
    pub fn new(geometry: &'a Geometry<T>, level: usize, coefficient: F) -> Self {
        assert!(
            level <= geometry.max_level(),
            "level {} exceeds the refinement depth {} of the geometry",
            level,
            geometry.max_level()
        );
        Self {
            geometry,
            level,
            coefficient,
            basis: BilinearBasis::new(),
            quadrature: quadrilateral_gauss(2),
            num_dofs: geometry.num_dofs_at_level(level),
        }
    }

    /// The geometry this assembler discretizes.
    pub fn geometry(&self) -> &Geometry<T> {
        self.geometry
    }

    /// The refinement level whose cells are assembled over.
    pub fn level(&self) -> usize {
        self.level
    }

    /// Number of vertices present at the assembled level.
    pub fn num_vertices(&self) -> usize {
        self.geometry.num_vertices_at_level(self.level)
    }

    /// Dimension of the assembled system.
    pub fn num_dofs(&self) -> usize {
        self.num_dofs
    }

    /// Assembles the global stiffness matrix in compressed column format.
    ///
    /// Entries are accumulated as triplets and compressed at the end;
    /// duplicate triplets from vertices shared between cells are summed
    /// during the conversion.
    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    pub fn assemble_stiffness(&self) -> CscMatrix<T> {
        let (weights, points) = &self.quadrature;
        let mut triplets = CooMatrix::new(self.num_dofs, self.num_dofs);

        for cell_index in self.geometry.mesh().cells_at_level(self.level) {
            let cell = self.geometry.mesh().cell(cell_index);
            let vertices = self.geometry.numbering().cell_vertex_ids(cell_index);
            let coefficient = (self.coefficient)(cell.center());
            // Chain rule for the reference-space gradients combined with
            // the Jacobian of the affine map onto the cell; the reference
            // cell [-1, 1]^2 has area 4.
            let scaling = cell.area() / 4.0 / cell.size();

            for (a, &vertex_a) in vertices.iter().enumerate() {
                let dof_a = match self.geometry.dof_of_vertex(vertex_a) {
                    Some(dof) => dof,
                    None => continue,
                };
                for (b, &vertex_b) in vertices.iter().enumerate() {
                    let dof_b = match self.geometry.dof_of_vertex(vertex_b) {
                        Some(dof) => dof,
                        None => continue,
                    };
                    let mut entry = T::zero();
                    for (w, xi) in izip!(weights, points) {
                        let grad_a = self.basis.gradient(a, xi);
                        let grad_b = self.basis.gradient(b, xi);
                        entry += grad_a.dot(&grad_b) * w.clone();
                    }
                    triplets.push(
                        dof_a,
                        dof_b,
                        entry * scaling.clone() * coefficient.clone(),
                    );
                }
            }
        }

        let stiffness = CscMatrix::from(&triplets);
        debug!(
            "assembled {}x{} stiffness matrix with {} explicit entries",
            stiffness.nrows(),
            stiffness.ncols(),
            stiffness.nnz()
        );
        stiffness
    }

    /// Assembles the load vector of a unit source term.
    pub fn assemble_rhs(&self) -> DVector<T> {
        let (weights, points) = &self.quadrature;
        let mut rhs = DVector::zeros(self.num_dofs);

        for cell_index in self.geometry.mesh().cells_at_level(self.level) {
            let cell = self.geometry.mesh().cell(cell_index);
            let vertices = self.geometry.numbering().cell_vertex_ids(cell_index);

            for (lin, &vertex) in vertices.iter().enumerate() {
                let dof = match self.geometry.dof_of_vertex(vertex) {
                    Some(dof) => dof,
                    None => continue,
                };
                let mut entry = T::zero();
                for (w, xi) in izip!(weights, points) {
                    entry += self.basis.evaluate(lin, xi) * w.clone();
                }
                rhs[dof] += entry * cell.area();
            }
        }

        rhs
    }

    /// Assembles the coupling of the eliminated Dirichlet columns with the
    /// prescribed boundary values `g`, restricted to free rows.
    ///
    /// Solving with inhomogeneous boundary data amounts to subtracting
    /// this vector from the load vector before handing the reduced system
    /// to a solver.
    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    pub fn assemble_dirichlet_lifting(&self, g: impl Fn(&Point2<T>) -> T) -> DVector<T> {
        let (weights, points) = &self.quadrature;
        let mut lifting = DVector::zeros(self.num_dofs);

        for cell_index in self.geometry.mesh().cells_at_level(self.level) {
            let cell = self.geometry.mesh().cell(cell_index);
            let vertices = self.geometry.numbering().cell_vertex_ids(cell_index);
            let coefficient = (self.coefficient)(cell.center());
            let scaling = cell.area() / 4.0 / cell.size();

            for (a, &vertex_a) in vertices.iter().enumerate() {
                let dof_a = match self.geometry.dof_of_vertex(vertex_a) {
                    Some(dof) => dof,
                    None => continue,
                };
                for (b, &vertex_b) in vertices.iter().enumerate() {
                    if !self.geometry.is_dirichlet_vertex(vertex_b) {
                        continue;
                    }
                    let boundary_value = g(self.geometry.numbering().coordinate(vertex_b));
                    let mut entry = T::zero();
                    for (w, xi) in izip!(weights, points) {
                        let grad_a = self.basis.gradient(a, xi);
                        let grad_b = self.basis.gradient(b, xi);
                        entry += grad_a.dot(&grad_b) * w.clone();
                    }
                    lifting[dof_a] +=
                        entry * scaling.clone() * coefficient.clone() * boundary_value;
                }
            }
        }

        lifting
    }

    /// Evaluates the finite element field at reference coordinates `xi` of
    /// the given cell.
    ///
    /// Unknowns are read from the DOF-indexed `solution` vector; Dirichlet
    /// vertices carry no stored value and take theirs from
    /// `dirichlet_value` instead.
    ///
    /// # Panics
    ///
    /// Panics if the solution dimension does not match the number of
    /// unknowns, or if the cell does not belong to the assembled level.
    pub fn evaluate_solution(
        &self,
        cell_index: CellIndex,
        xi: &Point2<T>,
        solution: &DVector<T>,
        dirichlet_value: impl Fn(&Point2<T>) -> T,
    ) -> T {
        assert_eq!(
            solution.len(),
            self.num_dofs,
            "solution vector does not match the number of unknowns"
        );
        let cell = self.geometry.mesh().cell(cell_index);
        assert_eq!(
            cell.level(),
            self.level,
            "cell does not belong to the assembled level"
        );
        let vertices = self.geometry.numbering().cell_vertex_ids(cell_index);

        let mut value = T::zero();
        for (lin, &vertex) in vertices.iter().enumerate() {
            let nodal = match self.geometry.dof_of_vertex(vertex) {
                Some(dof) => solution[dof].clone(),
                None => dirichlet_value(self.geometry.numbering().coordinate(vertex)),
            };
            value += nodal * self.basis.evaluate(lin, xi);
        }
        value
    }
}
