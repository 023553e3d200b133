use super::on_unit_square_boundary;
use nalgebra::Point2;
use proptest::prelude::*;
use yggdrasil::geometry::{number_vertices, Geometry};
use yggdrasil::mesh::{num_cells_at_level, Quadtree};

#[test]
fn depth_two_unit_square_scenario() {
    let geometry = Geometry::unit_square(2, |_: &Point2<f64>| true);

    assert_eq!(geometry.numbering().vertices_per_level(), &[4, 9, 25]);
    // The boundary ring of the 5x5 grid
    assert_eq!(geometry.boundary_vertices().len(), 16);
    assert_eq!(geometry.dirichlet_vertices().len(), 16);
    assert_eq!(geometry.data_size_per_level(), &[0, 1, 9]);
    assert_eq!(geometry.num_dofs_at_level(2), 9);
}

#[test]
fn vertex_ids_are_stable_across_refinement() {
    let mut coarse = Quadtree::<f64>::unit_square();
    coarse.split_to_level(1);
    let coarse_numbering = number_vertices(&coarse);

    let mut fine = Quadtree::<f64>::unit_square();
    fine.split_to_level(3);
    let fine_numbering = number_vertices(&fine);

    assert_eq!(
        coarse_numbering.vertices_per_level(),
        &fine_numbering.vertices_per_level()[..2]
    );
    for id in 0..coarse_numbering.num_vertices() {
        assert_eq!(coarse_numbering.coordinate(id), fine_numbering.coordinate(id));
    }
}

#[test]
fn coarse_level_ids_are_a_prefix_of_finer_levels() {
    let mut tree = Quadtree::<f64>::unit_square();
    tree.split_to_level(3);
    let numbering = number_vertices(&tree);

    let per_level = numbering.vertices_per_level();
    assert!(per_level.windows(2).all(|pair| pair[0] <= pair[1]));

    for level in 0..=3 {
        let bound = per_level[level];
        for cell in tree.cells_at_level(level) {
            for id in numbering.cell_vertex_ids(cell) {
                assert!(id < bound);
            }
        }
    }
}

#[test]
fn cell_vertex_ids_match_corner_coordinates() {
    let mut tree = Quadtree::<f64>::unit_square();
    tree.split_to_level(2);
    let numbering = number_vertices(&tree);

    for cell in tree.dfs() {
        let ids = numbering.cell_vertex_ids(cell);
        let corners = tree.cell_vertices(cell);
        for (id, corner) in ids.iter().zip(&corners) {
            assert_eq!(numbering.coordinate(*id), corner);
        }
    }
}

#[test]
fn cell_ordinals_enumerate_each_level_in_traversal_order() {
    let mut tree = Quadtree::<f64>::unit_square();
    tree.split_to_level(2);
    let numbering = number_vertices(&tree);

    for level in 0..=2 {
        let ordinals: Vec<_> = tree
            .cells_at_level(level)
            .map(|cell| numbering.cell_ordinal(cell))
            .collect();
        let expected: Vec<_> = (0..num_cells_at_level(level)).collect();
        assert_eq!(ordinals, expected);
    }
}

#[test]
fn dof_counts_complement_dirichlet_counts() {
    let geometry = Geometry::unit_square(3, on_unit_square_boundary);

    for level in 0..=3 {
        let vertices = geometry.num_vertices_at_level(level);
        let constrained = geometry.dirichlet_vertices().range(..vertices).count();
        assert_eq!(geometry.num_dofs_at_level(level) + constrained, vertices);
    }
}

#[test]
fn dof_maps_are_mutually_inverse() {
    let geometry = Geometry::unit_square(2, on_unit_square_boundary);

    for (vertex, dof) in geometry.vertex_to_dof().iter().enumerate() {
        match dof {
            Some(dof) => assert_eq!(geometry.vertex_of_dof(*dof), vertex),
            None => assert!(geometry.is_dirichlet_vertex(vertex)),
        }
    }
    for (dof, &vertex) in geometry.dof_to_vertex().iter().enumerate() {
        assert_eq!(geometry.dof_of_vertex(vertex), Some(dof));
        assert!(!geometry.is_dirichlet_vertex(vertex));
    }
}

#[test]
fn partial_dirichlet_predicate_constrains_only_matching_vertices() {
    // Dirichlet data on the left edge only
    let geometry = Geometry::unit_square(2, |p: &Point2<f64>| p.x < 1e-12);

    assert_eq!(geometry.boundary_vertices().len(), 16);
    assert_eq!(geometry.dirichlet_vertices().len(), 5);
    assert_eq!(geometry.num_dofs_at_level(2), 20);

    for &vertex in geometry.dirichlet_vertices() {
        assert!(geometry.numbering().coordinate(vertex).x.abs() < 1e-12);
    }
}

#[test]
fn vertex_lookup_by_coordinate() {
    let geometry = Geometry::unit_square(2, on_unit_square_boundary);
    let numbering = geometry.numbering();

    for id in 0..numbering.num_vertices() {
        assert_eq!(numbering.vertex_id_at(numbering.coordinate(id)), Some(id));
    }
    // Points far outside the domain hit no lattice vertex
    assert_eq!(numbering.vertex_id_at(&Point2::new(2.0, 3.0)), None);
}

proptest! {
    #[test]
    fn vertex_count_follows_the_tensor_grid_law(level in 0usize..5) {
        let geometry = Geometry::unit_square(level, on_unit_square_boundary);
        let per_level = geometry.numbering().vertices_per_level();
        prop_assert_eq!(per_level.len(), level + 1);
        for (l, &count) in per_level.iter().enumerate() {
            let side = (1usize << l) + 1;
            prop_assert_eq!(count, side * side);
        }
    }
}
