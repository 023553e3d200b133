//! Vertex numbering and degree-of-freedom classification for quadtree
//! meshes.
//!
//! [`number_vertices`] walks a refined [`Quadtree`] level by level and
//! deduplicates shared corner coordinates into a single global vertex
//! numbering in which the vertices of every coarse level form a prefix of
//! the finer ones. [`Geometry`] combines that numbering with a Dirichlet
//! predicate and derives the bidirectional maps between vertex indices and
//! the denser data (unknown) indices used by the assembled system.

use crate::mesh::{CellIndex, Quadtree};
use log::debug;
use nalgebra::{try_convert, Point2, RealField, Scalar};
use rustc_hash::FxHashMap;
use std::collections::BTreeSet;

/// Exact integer lattice coordinates of a vertex on the finest-level grid.
///
/// The corner at physical position `offset + (i, j) * size / 2^L`, with
/// `offset` and `size` taken from the root cell and `L` the maximum depth,
/// has key `(i, j)`. Every corner of every level lies on this lattice, so
/// quantizing onto it yields a collision-free deduplication key regardless
/// of floating-point drift in the corner computation.
type LatticeKey = (i64, i64);

#[derive(Debug, Clone)]
struct LatticeQuantizer {
    offset: [f64; 2],
    // 2^max_level / size, i.e. lattice cells per unit length
    inv_spacing: f64,
}

impl LatticeQuantizer {
    fn new<T: RealField>(mesh: &Quadtree<T>) -> Self {
        let root = mesh.cell(mesh.root());
        let offset = root.offset();
        let size: f64 = try_convert(root.size()).expect("cell size must fit in f64");
        let cells_per_side = (1u64 << mesh.max_level()) as f64;
        Self {
            offset: [
                try_convert(offset.x.clone()).expect("coordinate must fit in f64"),
                try_convert(offset.y.clone()).expect("coordinate must fit in f64"),
            ],
            inv_spacing: cells_per_side / size,
        }
    }

    fn key<T: RealField>(&self, point: &Point2<T>) -> LatticeKey {
        let x: f64 = try_convert(point.x.clone()).expect("coordinate must fit in f64");
        let y: f64 = try_convert(point.y.clone()).expect("coordinate must fit in f64");
        (
            ((x - self.offset[0]) * self.inv_spacing).round() as i64,
            ((y - self.offset[1]) * self.inv_spacing).round() as i64,
        )
    }
}

/// Output of the vertex numbering pass over a quadtree.
///
/// Produced by [`number_vertices`]; the mesh itself is left untouched. Ids
/// are assigned in first-encounter order of a level-ordered traversal, so
/// the vertices present at level `l` are exactly the ids
/// `0..vertices_per_level[l]`, for every level.
#[derive(Debug, Clone)]
pub struct VertexNumbering<T: Scalar> {
    vertex_coords: Vec<Point2<T>>,
    vertex_ids: FxHashMap<LatticeKey, usize>,
    quantizer: LatticeQuantizer,
    vertices_per_level: Vec<usize>,
    boundary_vertices: BTreeSet<usize>,
    cell_vertices: Vec<[usize; 4]>,
    cell_ordinals: Vec<usize>,
}

impl<T: Scalar> VertexNumbering<T> {
    /// Total number of vertices at the finest level.
    pub fn num_vertices(&self) -> usize {
        self.vertex_coords.len()
    }

    /// Coordinates of all vertices, indexed by vertex id.
    pub fn vertex_coords(&self) -> &[Point2<T>] {
        &self.vertex_coords
    }

    /// The coordinate of the given vertex.
    pub fn coordinate(&self, vertex: usize) -> &Point2<T> {
        &self.vertex_coords[vertex]
    }

    /// Cumulative vertex counts, one entry per level. Non-decreasing.
    pub fn vertices_per_level(&self) -> &[usize] {
        &self.vertices_per_level
    }

    /// Number of vertices present at the given level.
    pub fn num_vertices_at_level(&self, level: usize) -> usize {
        assert!(
            level < self.vertices_per_level.len(),
            "level {} exceeds the refinement depth {}",
            level,
            self.vertices_per_level.len() - 1
        );
        self.vertices_per_level[level]
    }

    /// Vertices that were incident to fewer than four cells at the level
    /// where they were examined.
    pub fn boundary_vertices(&self) -> &BTreeSet<usize> {
        &self.boundary_vertices
    }

    /// The global vertex ids of a cell's corners, ordered (-,-), (-,+),
    /// (+,-), (+,+).
    pub fn cell_vertex_ids(&self, cell: CellIndex) -> [usize; 4] {
        self.cell_vertices[cell]
    }

    /// Position of a cell among the cells of its level, under the fixed
    /// postorder traversal.
    pub fn cell_ordinal(&self, cell: CellIndex) -> usize {
        self.cell_ordinals[cell]
    }
}

impl<T: RealField> VertexNumbering<T> {
    /// Looks up the id of the vertex at the given coordinate, if any.
    pub fn vertex_id_at(&self, point: &Point2<T>) -> Option<usize> {
        self.vertex_ids.get(&self.quantizer.key(point)).copied()
    }
}

/// Numbers the vertices of a refined quadtree, level by level.
///
/// For each level, cells are visited in postorder and each of a cell's
/// four corners is looked up in (or inserted into) the global map, so ids
/// are assigned in first-encounter order and coarse-level ids form a
/// prefix of finer-level ones. A vertex incident to fewer than four cells
/// of a level is recorded as a boundary vertex; the flag is never cleared
/// at finer levels.
pub fn number_vertices<T: RealField>(mesh: &Quadtree<T>) -> VertexNumbering<T> {
    let max_level = mesh.max_level();
    let quantizer = LatticeQuantizer::new(mesh);

    let mut vertex_coords: Vec<Point2<T>> = Vec::new();
    let mut vertex_ids: FxHashMap<LatticeKey, usize> = FxHashMap::default();
    let mut vertices_per_level = Vec::with_capacity(max_level + 1);
    let mut boundary_vertices = BTreeSet::new();
    let mut cell_vertices = vec![[usize::MAX; 4]; mesh.num_cells()];
    let mut cell_ordinals = vec![0; mesh.num_cells()];

    for level in 0..=max_level {
        let mut incidence: FxHashMap<usize, usize> = FxHashMap::default();

        for (ordinal, cell) in mesh.cells_at_level(level).enumerate() {
            cell_ordinals[cell] = ordinal;
            for (corner, coord) in mesh.cell_vertices(cell).into_iter().enumerate() {
                let key = quantizer.key(&coord);
                let next_id = vertex_coords.len();
                let id = *vertex_ids.entry(key).or_insert_with(|| {
                    vertex_coords.push(coord);
                    next_id
                });
                cell_vertices[cell][corner] = id;
                *incidence.entry(id).or_insert(0) += 1;
            }
        }

        vertices_per_level.push(vertex_coords.len());

        // An interior vertex of this level is shared by a full 2x2 block of
        // cells; anything seen less often sits on the domain boundary.
        boundary_vertices.extend(
            incidence
                .iter()
                .filter(|&(_, &count)| count < 4)
                .map(|(&id, _)| id),
        );
    }

    debug!(
        "numbered {} vertices over {} levels ({} on the boundary)",
        vertex_coords.len(),
        max_level + 1,
        boundary_vertices.len()
    );

    VertexNumbering {
        vertex_coords,
        vertex_ids,
        quantizer,
        vertices_per_level,
        boundary_vertices,
        cell_vertices,
        cell_ordinals,
    }
}

/// A quadtree mesh together with vertex numbering and degree-of-freedom
/// classification.
///
/// Boundary vertices for which the Dirichlet predicate holds carry no
/// unknown; the remaining vertices are mapped to a second, denser
/// numbering of data (unknown) indices, assigned consecutively in vertex
/// id order. All derived maps are read-only after construction.
#[derive(Debug, Clone)]
pub struct Geometry<T: Scalar> {
    mesh: Quadtree<T>,
    numbering: VertexNumbering<T>,
    dirichlet_vertices: BTreeSet<usize>,
    data_size_per_level: Vec<usize>,
    vertex_to_dof: Vec<Option<usize>>,
    dof_to_vertex: Vec<usize>,
}

impl<T: RealField> Geometry<T> {
    /// Numbers the vertices of `mesh` and classifies its degrees of
    /// freedom.
    ///
    /// The predicate is evaluated once per boundary vertex, after the
    /// numbering pass; non-boundary vertices are never Dirichlet.
    pub fn new(mesh: Quadtree<T>, is_dirichlet: impl Fn(&Point2<T>) -> bool) -> Self {
        let numbering = number_vertices(&mesh);

        let dirichlet_vertices: BTreeSet<usize> = numbering
            .boundary_vertices()
            .iter()
            .copied()
            .filter(|&vertex| is_dirichlet(numbering.coordinate(vertex)))
            .collect();

        let data_size_per_level: Vec<usize> = numbering
            .vertices_per_level()
            .iter()
            .map(|&count| count - dirichlet_vertices.range(..count).count())
            .collect();

        let num_vertices = numbering.num_vertices();
        let mut vertex_to_dof = Vec::with_capacity(num_vertices);
        let mut dof_to_vertex = Vec::new();
        for vertex in 0..num_vertices {
            if dirichlet_vertices.contains(&vertex) {
                vertex_to_dof.push(None);
            } else {
                vertex_to_dof.push(Some(dof_to_vertex.len()));
                dof_to_vertex.push(vertex);
            }
        }

        debug!(
            "classified {} Dirichlet vertices, {} unknowns at the finest level",
            dirichlet_vertices.len(),
            dof_to_vertex.len()
        );

        Self {
            mesh,
            numbering,
            dirichlet_vertices,
            data_size_per_level,
            vertex_to_dof,
            dof_to_vertex,
        }
    }

    /// Builds a geometry on the unit square, refined to the given level.
    pub fn unit_square(level: usize, is_dirichlet: impl Fn(&Point2<T>) -> bool) -> Self {
        let mut mesh = Quadtree::unit_square();
        mesh.split_to_level(level);
        Self::new(mesh, is_dirichlet)
    }

    /// The underlying mesh.
    pub fn mesh(&self) -> &Quadtree<T> {
        &self.mesh
    }

    /// The vertex numbering derived from the mesh.
    pub fn numbering(&self) -> &VertexNumbering<T> {
        &self.numbering
    }

    /// The maximum refinement depth of the mesh.
    pub fn max_level(&self) -> usize {
        self.data_size_per_level.len() - 1
    }

    /// Boundary vertices of the numbering (not all of them are Dirichlet).
    pub fn boundary_vertices(&self) -> &BTreeSet<usize> {
        self.numbering.boundary_vertices()
    }

    /// Boundary vertices selected by the Dirichlet predicate.
    pub fn dirichlet_vertices(&self) -> &BTreeSet<usize> {
        &self.dirichlet_vertices
    }

    /// True iff the vertex is constrained by the Dirichlet predicate.
    pub fn is_dirichlet_vertex(&self, vertex: usize) -> bool {
        self.dirichlet_vertices.contains(&vertex)
    }

    /// Number of unknowns per level (vertices minus Dirichlet vertices).
    pub fn data_size_per_level(&self) -> &[usize] {
        &self.data_size_per_level
    }

    /// Number of vertices present at the given level.
    pub fn num_vertices_at_level(&self, level: usize) -> usize {
        self.numbering.num_vertices_at_level(level)
    }

    /// Number of unknowns at the given level.
    pub fn num_dofs_at_level(&self, level: usize) -> usize {
        assert!(
            level <= self.max_level(),
            "level {} exceeds the refinement depth {}",
            level,
            self.max_level()
        );
        self.data_size_per_level[level]
    }

    /// Map from vertex id to data index; `None` for Dirichlet vertices.
    pub fn vertex_to_dof(&self) -> &[Option<usize>] {
        &self.vertex_to_dof
    }

    /// Map from data index back to vertex id.
    pub fn dof_to_vertex(&self) -> &[usize] {
        &self.dof_to_vertex
    }

    /// The data index of a vertex, `None` if it is Dirichlet.
    pub fn dof_of_vertex(&self, vertex: usize) -> Option<usize> {
        self.vertex_to_dof[vertex]
    }

    /// The vertex id behind a data index.
    pub fn vertex_of_dof(&self, dof: usize) -> usize {
        self.dof_to_vertex[dof]
    }
}
