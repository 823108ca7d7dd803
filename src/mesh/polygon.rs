//! Convex planar polygons carrying an opaque metadata tag.

use crate::aabb::Aabb;
use crate::errors::CsgError;
use crate::float_types::Real;
use crate::mesh::plane::Plane;
use crate::mesh::vertex::Vertex;
use nalgebra::Vector3;

/// A convex, planar vertex loop with its cached [`Plane`] and a tag that is
/// copied unchanged into every fragment produced by splitting.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon<S: Clone> {
    pub vertices: Vec<Vertex>,
    pub plane: Plane,
    pub metadata: Option<S>,
}

impl<S: Clone> Polygon<S> {
    /// Create a polygon from a vertex loop, deriving its plane.
    ///
    /// Fails with [`CsgError::TooFewVertices`] for fewer than three vertices,
    /// [`CsgError::NonFiniteCoordinate`] for NaN/inf positions and
    /// [`CsgError::DegeneratePolygon`] when the loop has no area.
    pub fn new(vertices: Vec<Vertex>, metadata: Option<S>) -> Result<Self, CsgError> {
        if vertices.len() < 3 {
            return Err(CsgError::TooFewVertices {
                count: vertices.len(),
            });
        }
        if let Some(bad) = vertices.iter().find(|v| !v.is_finite()) {
            return Err(CsgError::NonFiniteCoordinate(bad.pos));
        }
        let plane = Plane::from_vertices(&vertices)?;
        Ok(Polygon {
            vertices,
            plane,
            metadata,
        })
    }

    /// Assemble a polygon from parts without validation. Used for split
    /// fragments, which inherit the plane of the polygon they were cut from.
    pub(crate) const fn from_parts(vertices: Vec<Vertex>, plane: Plane, metadata: Option<S>) -> Self {
        Polygon {
            vertices,
            plane,
            metadata,
        }
    }

    /// Reverse winding, vertex normals and plane.
    pub fn flip(&mut self) {
        self.vertices.reverse();
        self.vertices.iter_mut().for_each(|v| v.flip());
        self.plane.flip();
    }

    /// Twice the vector area, `Σ (pᵢ - p₀) × (pᵢ₊₁ - p₀)`.
    fn area_vector(&self) -> Vector3<Real> {
        let Some(first) = self.vertices.first() else {
            return Vector3::zeros();
        };
        self.vertices
            .windows(2)
            .skip(1)
            .fold(Vector3::zeros(), |acc, pair| {
                acc + (pair[0].pos - first.pos).cross(&(pair[1].pos - first.pos))
            })
    }

    /// Surface area of the loop.
    pub fn area(&self) -> Real {
        0.5 * self.area_vector().norm()
    }

    /// Largest distance of any vertex from the cached plane.
    pub fn max_plane_deviation(&self) -> Real {
        self.vertices
            .iter()
            .map(|v| self.plane.signed_distance(&v.pos).abs())
            .fold(0.0, Real::max)
    }

    /// `true` for loops that carry no usable surface: fewer than three
    /// vertices, area at or below `epsilon²`, or vertices further than
    /// `epsilon` from the plane.
    pub fn is_degenerate(&self, epsilon: Real) -> bool {
        self.vertices.len() < 3
            || self.area() <= epsilon * epsilon
            || self.max_plane_deviation() > epsilon
    }

    /// Consecutive vertex pairs, closing the loop.
    pub fn edges(&self) -> impl Iterator<Item = (&Vertex, &Vertex)> + '_ {
        self.vertices
            .iter()
            .zip(self.vertices.iter().cycle().skip(1))
    }

    /// Fan triangulation. Valid because polygons are convex.
    pub fn triangulate(&self) -> Vec<[Vertex; 3]> {
        if self.vertices.len() < 3 {
            return Vec::new();
        }
        let v0 = self.vertices[0];
        self.vertices[1..]
            .windows(2)
            .map(|pair| [v0, pair[0], pair[1]])
            .collect()
    }

    pub fn bounding_box(&self) -> Aabb {
        Aabb::from_points(self.vertices.iter().map(|v| v.pos))
    }

    pub const fn metadata(&self) -> Option<&S> {
        self.metadata.as_ref()
    }

    pub fn set_metadata(&mut self, data: S) {
        self.metadata = Some(data);
    }
}
