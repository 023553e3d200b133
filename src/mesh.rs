//! Quadtree meshes over square two-dimensional domains.
//!
//! A [`Quadtree`] partitions a square region into a hierarchy of square
//! cells, four children per split. Cells live in an arena and are addressed
//! by [`CellIndex`] handles: a parent owns its children through the arena,
//! and a child's back-reference to its parent is a plain handle used only
//! for upward traversal.
//!
//! Refinement is uniform: [`Quadtree::split`] splits every current leaf at
//! once, so all leaves of a tree always share the same depth and no hanging
//! nodes can occur.

use nalgebra::{Point2, RealField, Scalar};
use numeric_literals::replace_float_literals;
use serde::{Deserialize, Serialize};

/// Handle addressing a cell within its [`Quadtree`] arena.
pub type CellIndex = usize;

/// The number of cells a tree of the given depth has at its finest level.
pub fn num_cells_at_level(level: usize) -> usize {
    4usize.pow(level as u32)
}

/// A single square cell of a [`Quadtree`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(serialize = "T: Serialize", deserialize = "T: Deserialize<'de>"))]
pub struct Cell<T: Scalar> {
    center: Point2<T>,
    size: T,
    level: usize,
    parent: Option<CellIndex>,
    children: Option<[CellIndex; 4]>,
}

impl<T: Scalar> Cell<T> {
    /// The center of the cell.
    pub fn center(&self) -> &Point2<T> {
        &self.center
    }

    /// The side length of the cell.
    pub fn size(&self) -> T {
        self.size.clone()
    }

    /// Depth of the cell below the root (the root has level 0).
    pub fn level(&self) -> usize {
        self.level
    }

    /// True iff the cell has not been split.
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Handle of the parent cell, absent for the root.
    pub fn parent(&self) -> Option<CellIndex> {
        self.parent
    }

    /// Handles of the four children, in order NW, NE, SW, SE.
    pub fn children(&self) -> Option<&[CellIndex; 4]> {
        self.children.as_ref()
    }
}

impl<T: RealField> Cell<T> {
    /// The lower-left corner of the cell.
    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    pub fn offset(&self) -> Point2<T> {
        let half = self.size.clone() * 0.5;
        Point2::new(self.center.x.clone() - half.clone(), self.center.y.clone() - half)
    }

    /// The area of the cell.
    pub fn area(&self) -> T {
        self.size.clone() * self.size.clone()
    }

    /// The four corners of the cell, ordered (-,-), (-,+), (+,-), (+,+)
    /// in the local sign convention.
    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    pub fn corners(&self) -> [Point2<T>; 4] {
        let half = self.size.clone() * 0.5;
        let (cx, cy) = (self.center.x.clone(), self.center.y.clone());
        [
            Point2::new(cx.clone() - half.clone(), cy.clone() - half.clone()),
            Point2::new(cx.clone() - half.clone(), cy.clone() + half.clone()),
            Point2::new(cx.clone() + half.clone(), cy.clone() - half.clone()),
            Point2::new(cx + half.clone(), cy + half),
        ]
    }

    /// Maps a point of the domain to the cell's reference coordinates,
    /// where the cell itself maps onto `[-1, 1]^2`.
    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    pub fn map_to_reference(&self, x: &Point2<T>) -> Point2<T> {
        Point2::from((x - &self.center) * (2.0 / self.size.clone()))
    }

    /// Maps reference coordinates in `[-1, 1]^2` to the domain.
    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    pub fn map_from_reference(&self, xi: &Point2<T>) -> Point2<T> {
        &self.center + xi.coords.clone() * (self.size.clone() * 0.5)
    }

    /// True iff `point` lies in the closed cell, with tolerance `eps` on
    /// every side.
    pub fn contains_point(&self, point: &Point2<T>, eps: T) -> bool {
        let offset = self.offset();
        let right = offset.x.clone() + self.size.clone();
        let top = offset.y.clone() + self.size.clone();
        point.x >= offset.x.clone() - eps.clone()
            && point.x <= right + eps.clone()
            && point.y >= offset.y.clone() - eps.clone()
            && point.y <= top + eps
    }
}

/// Quadtree partition of a square domain.
///
/// The tree is built with [`from_center_and_size`](Quadtree::from_center_and_size)
/// and refined with [`split`](Quadtree::split) or
/// [`split_to_level`](Quadtree::split_to_level); there is no coarsening.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(serialize = "T: Serialize", deserialize = "T: Deserialize<'de>"))]
pub struct Quadtree<T: Scalar> {
    cells: Vec<Cell<T>>,
}

impl<T: RealField> Quadtree<T> {
    /// Creates an unrefined tree consisting of a single root cell.
    pub fn from_center_and_size(center: Point2<T>, size: T) -> Self {
        assert!(size > T::zero(), "cell size must be positive");
        Self {
            cells: vec![Cell {
                center,
                size,
                level: 0,
                parent: None,
                children: None,
            }],
        }
    }

    /// Creates an unrefined tree covering the unit square `[0, 1]^2`.
    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    pub fn unit_square() -> Self {
        Self::from_center_and_size(Point2::new(0.5, 0.5), 1.0)
    }

    /// Handle of the root cell.
    pub fn root(&self) -> CellIndex {
        0
    }

    /// The cell addressed by `index`.
    pub fn cell(&self, index: CellIndex) -> &Cell<T> {
        &self.cells[index]
    }

    /// Total number of cells across all levels.
    pub fn num_cells(&self) -> usize {
        self.cells.len()
    }

    /// The maximum depth among the leaves of the tree.
    pub fn max_level(&self) -> usize {
        self.cells
            .iter()
            .filter(|cell| cell.is_leaf())
            .map(|cell| cell.level)
            .max()
            .expect("a quadtree always contains at least the root cell")
    }

    /// Splits every leaf cell into four children of half the size and
    /// returns the new maximum depth.
    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    pub fn split(&mut self) -> usize {
        let leaves: Vec<CellIndex> = (0..self.cells.len())
            .filter(|&index| self.cells[index].is_leaf())
            .collect();

        for parent in leaves {
            let offset = self.cells[parent].offset();
            let size = self.cells[parent].size();
            let level = self.cells[parent].level();
            let child_size = size.clone() * 0.5;

            // Child centers sit at the centers of the four quadrants,
            // in child order NW, NE, SW, SE.
            let quadrant_centers = [(0.25, 0.75), (0.75, 0.75), (0.25, 0.25), (0.75, 0.25)];

            let mut children = [0; 4];
            for (slot, (fx, fy)) in quadrant_centers.into_iter().enumerate() {
                let center = Point2::new(
                    offset.x.clone() + size.clone() * fx,
                    offset.y.clone() + size.clone() * fy,
                );
                children[slot] = self.cells.len();
                self.cells.push(Cell {
                    center,
                    size: child_size.clone(),
                    level: level + 1,
                    parent: Some(parent),
                    children: None,
                });
            }
            self.cells[parent].children = Some(children);
        }

        self.max_level()
    }

    /// Repeatedly splits until every leaf is at depth `level`, and returns
    /// the resulting maximum depth.
    ///
    /// Requesting a level at or below the current depth is a no-op, so the
    /// call is idempotent.
    pub fn split_to_level(&mut self, level: usize) -> usize {
        let mut max_level = self.max_level();
        while max_level < level {
            max_level = self.split();
        }
        max_level
    }

    /// The four corner coordinates of a cell, ordered (-,-), (-,+), (+,-),
    /// (+,+).
    pub fn cell_vertices(&self, index: CellIndex) -> [Point2<T>; 4] {
        self.cells[index].corners()
    }

    /// Walks parent handles up to the root.
    pub fn ancestor_root(&self, index: CellIndex) -> CellIndex {
        let mut current = index;
        while let Some(parent) = self.cells[current].parent {
            current = parent;
        }
        current
    }

    /// Finds the leaf cell containing `point` by descending from the root,
    /// or `None` if the point lies outside the domain.
    ///
    /// Points on shared cell edges resolve to the first containing child in
    /// child order.
    pub fn locate(&self, point: &Point2<T>, eps: T) -> Option<CellIndex> {
        let mut current = self.root();
        if !self.cells[current].contains_point(point, eps.clone()) {
            return None;
        }
        while let Some(children) = self.cells[current].children {
            current = children
                .iter()
                .copied()
                .find(|&child| self.cells[child].contains_point(point, eps.clone()))?;
        }
        Some(current)
    }

    /// Postorder traversal of all cells: children are visited before their
    /// parent, in child order. The iterator is lazy; call `dfs` again to
    /// restart the traversal.
    pub fn dfs(&self) -> Postorder<'_, T> {
        Postorder {
            tree: self,
            stack: vec![(self.root(), 0)],
        }
    }

    /// The postorder traversal restricted to cells at exactly `level`.
    ///
    /// This fixes the deterministic per-level enumeration order used by the
    /// vertex numbering.
    pub fn cells_at_level(&self, level: usize) -> impl Iterator<Item = CellIndex> + '_ {
        self.dfs().filter(move |&index| self.cells[index].level == level)
    }
}

/// Lazy postorder iterator over the cells of a [`Quadtree`].
#[derive(Debug, Clone)]
pub struct Postorder<'a, T: Scalar> {
    tree: &'a Quadtree<T>,
    // (cell, number of children already expanded)
    stack: Vec<(CellIndex, usize)>,
}

impl<'a, T: Scalar> Iterator for Postorder<'a, T> {
    type Item = CellIndex;

    fn next(&mut self) -> Option<CellIndex> {
        loop {
            let &(cell, cursor) = self.stack.last()?;
            match self.tree.cells[cell].children {
                Some(children) if cursor < children.len() => {
                    self.stack.last_mut().unwrap().1 += 1;
                    self.stack.push((children[cursor], 0));
                }
                _ => {
                    self.stack.pop();
                    return Some(cell);
                }
            }
        }
    }
}
