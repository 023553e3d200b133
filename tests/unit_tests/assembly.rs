use super::{on_unit_square_boundary, to_dense};
use matrixcompare::{assert_matrix_eq, assert_scalar_eq};
use nalgebra::Point2;
use yggdrasil::assembly::Discretization;
use yggdrasil::geometry::Geometry;

#[test]
fn depth_two_all_dirichlet_system_dimensions() {
    let geometry = Geometry::unit_square(2, on_unit_square_boundary);
    let discretization = Discretization::new(&geometry, 2, |_: &Point2<f64>| 1.0);

    assert_eq!(discretization.num_vertices(), 25);
    assert_eq!(discretization.num_dofs(), 9);

    let stiffness = discretization.assemble_stiffness();
    assert_eq!(stiffness.nrows(), 9);
    assert_eq!(stiffness.ncols(), 9);

    let rhs = discretization.assemble_rhs();
    assert_eq!(rhs.len(), 9);
}

#[test]
fn stiffness_is_symmetric_for_variable_coefficients() {
    let geometry = Geometry::unit_square(3, on_unit_square_boundary);
    let coefficient = |p: &Point2<f64>| 1.0 + p.x + 2.0 * p.y;
    let stiffness = Discretization::new(&geometry, 3, coefficient).assemble_stiffness();

    assert_matrix_eq!(stiffness, stiffness.transpose(), comp = abs, tol = 1e-13);
}

#[test]
fn element_contributions_match_reference_values() {
    // Unconstrained level-1 grid: data indices coincide with vertex ids
    let geometry = Geometry::unit_square(1, |_: &Point2<f64>| false);
    let discretization = Discretization::new(&geometry, 1, |_: &Point2<f64>| 1.0);
    let stiffness = to_dense(&discretization.assemble_stiffness());

    let id = |x: f64, y: f64| {
        geometry
            .numbering()
            .vertex_id_at(&Point2::new(x, y))
            .unwrap()
    };

    // On the reference cell the bilinear gradient products integrate to
    // 2/3 (diagonal), -1/6 (edge-adjacent) and -1/3 (diagonally opposite);
    // every contribution is scaled by K * area / 4 / size = h / 4.
    let scale = 0.5 / 4.0;
    assert_scalar_eq!(stiffness[(id(0.0, 0.0), id(0.0, 0.0))], scale * 2.0 / 3.0, comp = abs, tol = 1e-14);
    assert_scalar_eq!(stiffness[(id(0.5, 0.5), id(0.5, 0.5))], 4.0 * scale * 2.0 / 3.0, comp = abs, tol = 1e-14);
    assert_scalar_eq!(stiffness[(id(0.0, 0.0), id(0.5, 0.0))], -scale / 6.0, comp = abs, tol = 1e-14);
    assert_scalar_eq!(stiffness[(id(0.5, 0.0), id(0.5, 0.5))], -2.0 * scale / 6.0, comp = abs, tol = 1e-14);
    assert_scalar_eq!(stiffness[(id(0.0, 0.0), id(0.5, 0.5))], -scale / 3.0, comp = abs, tol = 1e-14);
    // Vertices that share no cell do not couple
    assert_scalar_eq!(stiffness[(id(0.0, 0.0), id(1.0, 1.0))], 0.0, comp = abs, tol = 1e-14);
}

#[test]
fn coefficient_is_sampled_at_cell_centers() {
    let geometry = Geometry::unit_square(1, |_: &Point2<f64>| false);
    // Piecewise coefficient: 10 on the left half, 1 on the right
    let coefficient = |p: &Point2<f64>| if p.x < 0.5 { 10.0 } else { 1.0 };
    let discretization = Discretization::new(&geometry, 1, coefficient);
    let stiffness = to_dense(&discretization.assemble_stiffness());

    let id = |x: f64, y: f64| {
        geometry
            .numbering()
            .vertex_id_at(&Point2::new(x, y))
            .unwrap()
    };

    let scale = 0.5 / 4.0;
    // The lower-left domain corner belongs to a single left-half cell
    assert_scalar_eq!(stiffness[(id(0.0, 0.0), id(0.0, 0.0))], 10.0 * scale * 2.0 / 3.0, comp = abs, tol = 1e-13);
    // Its mirror image on the right sees the unit coefficient
    assert_scalar_eq!(stiffness[(id(1.0, 0.0), id(1.0, 0.0))], scale * 2.0 / 3.0, comp = abs, tol = 1e-13);
}

#[test]
fn load_vector_accumulates_per_cell_basis_integrals() {
    let geometry = Geometry::unit_square(1, |_: &Point2<f64>| false);
    let discretization = Discretization::new(&geometry, 1, |_: &Point2<f64>| 1.0);
    let rhs = discretization.assemble_rhs();

    let id = |x: f64, y: f64| {
        geometry
            .numbering()
            .vertex_id_at(&Point2::new(x, y))
            .unwrap()
    };

    // Each basis function integrates to 1 over the reference cell, so a
    // vertex accumulates area * 1 from every incident cell.
    let area = 0.25;
    assert_scalar_eq!(rhs[id(0.0, 0.0)], area, comp = abs, tol = 1e-14);
    assert_scalar_eq!(rhs[id(0.5, 0.0)], 2.0 * area, comp = abs, tol = 1e-14);
    assert_scalar_eq!(rhs[id(0.5, 0.5)], 4.0 * area, comp = abs, tol = 1e-14);

    let total: f64 = rhs.iter().sum();
    assert_scalar_eq!(total, 4.0, comp = abs, tol = 1e-13);
}

#[test]
fn patch_test_recovers_a_linear_field() {
    let geometry = Geometry::unit_square(2, on_unit_square_boundary);
    let discretization = Discretization::new(&geometry, 2, |_: &Point2<f64>| 1.0);
    let boundary_value = |p: &Point2<f64>| p.x;

    let stiffness = to_dense(&discretization.assemble_stiffness());
    let lifting = discretization.assemble_dirichlet_lifting(boundary_value);

    // Zero source: the reduced system balances the eliminated columns
    let solution = stiffness
        .lu()
        .solve(&(-lifting))
        .expect("reduced stiffness matrix must be invertible");

    for (dof, value) in solution.iter().enumerate() {
        let vertex = geometry.vertex_of_dof(dof);
        let coord = geometry.numbering().coordinate(vertex);
        assert_scalar_eq!(*value, coord.x, comp = abs, tol = 1e-12);
    }

    // The interpolated field is linear across every cell
    for cell in geometry.mesh().cells_at_level(2) {
        let center = geometry.mesh().cell(cell).center().clone();
        let at_center = discretization.evaluate_solution(
            cell,
            &Point2::new(0.0, 0.0),
            &solution,
            boundary_value,
        );
        assert_scalar_eq!(at_center, center.x, comp = abs, tol = 1e-12);
    }
}

#[test]
fn assembling_a_coarser_level_of_a_deep_tree() {
    let geometry = Geometry::unit_square(3, on_unit_square_boundary);
    let discretization = Discretization::new(&geometry, 2, |_: &Point2<f64>| 1.0);

    assert_eq!(discretization.num_dofs(), geometry.num_dofs_at_level(2));

    let stiffness = discretization.assemble_stiffness();
    assert_eq!(stiffness.nrows(), geometry.num_dofs_at_level(2));
    assert_eq!(stiffness.ncols(), geometry.num_dofs_at_level(2));

    let rhs = discretization.assemble_rhs();
    assert_eq!(rhs.len(), geometry.num_dofs_at_level(2));
}

#[test]
fn lifting_vanishes_for_homogeneous_boundary_data() {
    let geometry = Geometry::unit_square(2, on_unit_square_boundary);
    let discretization = Discretization::new(&geometry, 2, |_: &Point2<f64>| 1.0);
    let lifting = discretization.assemble_dirichlet_lifting(|_: &Point2<f64>| 0.0);

    assert_eq!(lifting.len(), 9);
    assert!(lifting.iter().all(|v| v.abs() < 1e-15));
}

#[test]
#[should_panic]
fn discretization_rejects_levels_beyond_the_refinement_depth() {
    let geometry = Geometry::unit_square(1, on_unit_square_boundary);
    let _ = Discretization::new(&geometry, 2, |_: &Point2<f64>| 1.0);
}
