//! Boolean operations on polygon soups.
//!
//! Every entrypoint borrows its operands and clones them into private
//! [`BspTree`]s, so callers never observe the in-place tree algebra.
//!
//! ```
//! # use csgbsp::boolean::{self, BooleanOp};
//! # use csgbsp::mesh::Mesh;
//! let a: Mesh<()> = Mesh::cube(1.0, None);
//! let b = Mesh::cube(1.0, None);
//! let nothing = boolean::perform(BooleanOp::Subtraction, &a.polygons, &b.polygons);
//! assert!(nothing.is_empty());
//! ```

use crate::aabb::Aabb;
use crate::errors::CsgError;
use crate::float_types::{Real, tolerance};
use crate::mesh::bsp::{BspTree, PlaneSelection};
use crate::mesh::polygon::Polygon;
use crate::mesh::signed_volume_of;
use tracing::{debug, instrument};

/// The three primitive operations, in the order the original tooling
/// exposed them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BooleanOp {
    Union,
    Subtraction,
    Intersection,
}

/// Per-call knobs of the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CsgOptions {
    /// Half-thickness of the band around a plane that counts as "on" it.
    pub epsilon: Real,
    /// How a new tree node picks its splitting polygon.
    pub plane_selection: PlaneSelection,
}

impl Default for CsgOptions {
    /// Uses the process-wide [`tolerance`] and the first-polygon heuristic.
    fn default() -> Self {
        Self {
            epsilon: tolerance(),
            plane_selection: PlaneSelection::First,
        }
    }
}

impl CsgOptions {
    pub const fn with_epsilon(mut self, epsilon: Real) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub const fn with_plane_selection(mut self, plane_selection: PlaneSelection) -> Self {
        self.plane_selection = plane_selection;
        self
    }

    /// Rejects tolerances that are not finite and strictly positive.
    pub fn validate(&self) -> Result<(), CsgError> {
        if self.epsilon.is_finite() && self.epsilon > 0.0 {
            Ok(())
        } else {
            Err(CsgError::InvalidTolerance(self.epsilon))
        }
    }

    fn tree<S: Clone>(&self, polygons: &[Polygon<S>]) -> BspTree<S> {
        let mut tree = BspTree::new(self.epsilon);
        tree.build_with(polygons.to_vec(), &self.plane_selection);
        tree
    }
}

/// Surface of `a ∪ b`.
pub fn union<S: Clone>(a: &[Polygon<S>], b: &[Polygon<S>]) -> Vec<Polygon<S>> {
    compose(BooleanOp::Union, a, b, &CsgOptions::default())
}

/// Surface of `a \ b`.
pub fn subtract<S: Clone>(a: &[Polygon<S>], b: &[Polygon<S>]) -> Vec<Polygon<S>> {
    compose(BooleanOp::Subtraction, a, b, &CsgOptions::default())
}

/// Surface of `a ∩ b`.
pub fn intersect<S: Clone>(a: &[Polygon<S>], b: &[Polygon<S>]) -> Vec<Polygon<S>> {
    compose(BooleanOp::Intersection, a, b, &CsgOptions::default())
}

/// Surface of the symmetric difference `(a \ b) ∪ (b \ a)`.
pub fn xor<S: Clone>(a: &[Polygon<S>], b: &[Polygon<S>]) -> Vec<Polygon<S>> {
    symmetric_difference(a, b, &CsgOptions::default())
}

/// Dispatch on `op` with default options.
pub fn perform<S: Clone>(op: BooleanOp, a: &[Polygon<S>], b: &[Polygon<S>]) -> Vec<Polygon<S>> {
    compose(op, a, b, &CsgOptions::default())
}

pub fn union_with<S: Clone>(
    a: &[Polygon<S>],
    b: &[Polygon<S>],
    options: &CsgOptions,
) -> Result<Vec<Polygon<S>>, CsgError> {
    perform_with(BooleanOp::Union, a, b, options)
}

pub fn subtract_with<S: Clone>(
    a: &[Polygon<S>],
    b: &[Polygon<S>],
    options: &CsgOptions,
) -> Result<Vec<Polygon<S>>, CsgError> {
    perform_with(BooleanOp::Subtraction, a, b, options)
}

pub fn intersect_with<S: Clone>(
    a: &[Polygon<S>],
    b: &[Polygon<S>],
    options: &CsgOptions,
) -> Result<Vec<Polygon<S>>, CsgError> {
    perform_with(BooleanOp::Intersection, a, b, options)
}

pub fn xor_with<S: Clone>(
    a: &[Polygon<S>],
    b: &[Polygon<S>],
    options: &CsgOptions,
) -> Result<Vec<Polygon<S>>, CsgError> {
    options.validate()?;
    check_operands(a, b)?;
    Ok(symmetric_difference(a, b, options))
}

/// Dispatch on `op` after validating `options` and both operands.
///
/// A polygon with fewer than three vertices or a non-finite coordinate is
/// reported as [`CsgError::InvalidPolygon`]. Its index counts through `a`
/// and then `b`, so the first polygon of `b` is `a.len()`.
pub fn perform_with<S: Clone>(
    op: BooleanOp,
    a: &[Polygon<S>],
    b: &[Polygon<S>],
    options: &CsgOptions,
) -> Result<Vec<Polygon<S>>, CsgError> {
    options.validate()?;
    check_operands(a, b)?;
    Ok(compose(op, a, b, options))
}

fn check_operands<S: Clone>(a: &[Polygon<S>], b: &[Polygon<S>]) -> Result<(), CsgError> {
    for (index, polygon) in a.iter().chain(b).enumerate() {
        if polygon.vertices.len() < 3 {
            let count = polygon.vertices.len();
            return Err(CsgError::TooFewVertices { count }.at_polygon(index));
        }
        if let Some(bad) = polygon.vertices.iter().find(|v| !v.is_finite()) {
            return Err(CsgError::NonFiniteCoordinate(bad.pos).at_polygon(index));
        }
    }
    Ok(())
}

fn symmetric_difference<S: Clone>(
    a: &[Polygon<S>],
    b: &[Polygon<S>],
    options: &CsgOptions,
) -> Vec<Polygon<S>> {
    let a_sub_b = compose(BooleanOp::Subtraction, a, b, options);
    let b_sub_a = compose(BooleanOp::Subtraction, b, a, options);
    compose(BooleanOp::Union, &a_sub_b, &b_sub_a, options)
}

#[instrument(level = "debug", skip_all, fields(op = ?op, a = a.len(), b = b.len()))]
fn compose<S: Clone>(
    op: BooleanOp,
    a: &[Polygon<S>],
    b: &[Polygon<S>],
    options: &CsgOptions,
) -> Vec<Polygon<S>> {
    match op {
        BooleanOp::Union if a.is_empty() => return b.to_vec(),
        BooleanOp::Union if b.is_empty() => return a.to_vec(),
        BooleanOp::Subtraction if a.is_empty() || b.is_empty() => return a.to_vec(),
        BooleanOp::Intersection if a.is_empty() || b.is_empty() => return Vec::new(),
        _ => {},
    }

    if separated_solids(a, b, options.epsilon) {
        debug!("operands are disjoint solids, no splitting needed");
        return match op {
            BooleanOp::Union => a.iter().chain(b).cloned().collect(),
            BooleanOp::Subtraction => a.to_vec(),
            BooleanOp::Intersection => Vec::new(),
        };
    }

    let mut a_tree = options.tree(a);
    let mut b_tree = options.tree(b);

    match op {
        BooleanOp::Union => merge(&mut a_tree, b_tree, options),
        BooleanOp::Subtraction => {
            a_tree.invert();
            merge(&mut a_tree, b_tree, options);
            a_tree.invert();
        },
        BooleanOp::Intersection => {
            a_tree.invert();
            b_tree.clip_to(&a_tree);
            b_tree.invert();
            a_tree.clip_to(&b_tree);
            // drops faces of b that only lie on the boundary of a
            b_tree.clip_to(&a_tree);
            a_tree.build_with(b_tree.into_polygons(), &options.plane_selection);
            a_tree.invert();
        },
    }

    let result = a_tree.into_polygons();
    debug!(polygons = result.len(), "boolean result");
    result
}

/// The union sequence: afterwards `a` holds the surface of `a ∪ b`.
fn merge<S: Clone>(a: &mut BspTree<S>, mut b: BspTree<S>, options: &CsgOptions) {
    a.clip_to(&b);
    b.clip_to(a);
    b.invert();
    b.clip_to(a);
    b.invert();
    a.build_with(b.into_polygons(), &options.plane_selection);
}

/// `true` when both operands are positive-volume solids whose bounding
/// boxes are further than `epsilon` apart.
fn separated_solids<S: Clone>(a: &[Polygon<S>], b: &[Polygon<S>], epsilon: Real) -> bool {
    let a_box = Aabb::from_points(a.iter().flat_map(|p| p.vertices.iter().map(|v| v.pos)));
    let b_box = Aabb::from_points(b.iter().flat_map(|p| p.vertices.iter().map(|v| v.pos)));
    !a_box.intersects(&b_box, epsilon)
        && signed_volume_of(a) > epsilon
        && signed_volume_of(b) > epsilon
}
