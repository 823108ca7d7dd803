//! Oriented planes: point classification and polygon splitting.

use crate::errors::CsgError;
use crate::float_types::Real;
use crate::mesh::polygon::Polygon;
use crate::mesh::vertex::Vertex;
use nalgebra::{Point3, Vector3};
use tracing::debug;

// Plane classification bits. A polygon's type is the OR of its vertex types,
// so FRONT | BACK == SPANNING.
pub const COPLANAR: i8 = 0;
pub const FRONT: i8 = 1;
pub const BACK: i8 = 2;
pub const SPANNING: i8 = 3;

/// An oriented plane `normal · p - w = 0`, with a unit `normal`.
///
/// Points with positive signed distance lie in *front* (outside), points
/// with negative signed distance lie *behind* (inside).
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    pub normal: Vector3<Real>,
    pub w: Real,
}

impl Plane {
    /// Create a plane from a normal and offset. The normal is normalized,
    /// `w` is taken as the offset along that unit normal.
    ///
    /// The normal must be non-zero.
    pub fn from_normal(normal: Vector3<Real>, w: Real) -> Self {
        Plane {
            normal: normal.normalize(),
            w,
        }
    }

    /// Create a plane through three points. The normal follows the
    /// right-hand rule `(b - a) × (c - a)`.
    ///
    /// Returns `None` when the points are (nearly) collinear.
    pub fn from_points(a: Point3<Real>, b: Point3<Real>, c: Point3<Real>) -> Option<Self> {
        let ab = b - a;
        let ac = c - a;
        let cross = ab.cross(&ac);
        let len = cross.norm();
        // sin(angle) between the two edges, so the test does not depend on scale
        if len <= Real::EPSILON * ab.norm() * ac.norm() {
            return None;
        }
        let normal = cross / len;
        Some(Plane {
            normal,
            w: normal.dot(&a.coords),
        })
    }

    /// Derive the plane of a vertex loop from its first three vertices.
    ///
    /// When those three happen to be collinear (a vertex sitting on an edge)
    /// the loop's Newell normal is used instead, oriented with the winding.
    pub fn from_vertices(vertices: &[Vertex]) -> Result<Self, CsgError> {
        if vertices.len() < 3 {
            return Err(CsgError::TooFewVertices {
                count: vertices.len(),
            });
        }

        if let Some(plane) = Self::from_points(vertices[0].pos, vertices[1].pos, vertices[2].pos)
        {
            return Ok(plane);
        }

        let origin = vertices[0].pos;
        let newell = vertices
            .iter()
            .zip(vertices.iter().cycle().skip(1))
            .fold(Vector3::zeros(), |acc: Vector3<Real>, (curr, next)| {
                acc + (curr.pos - origin).cross(&(next.pos - origin))
            });
        let perimeter: Real = vertices
            .iter()
            .zip(vertices.iter().cycle().skip(1))
            .map(|(curr, next)| curr.distance_to(next))
            .sum();

        let len = newell.norm();
        if len <= Real::EPSILON * perimeter * perimeter {
            return Err(CsgError::DegeneratePolygon(origin));
        }
        let normal = newell / len;
        Ok(Plane {
            normal,
            w: normal.dot(&origin.coords),
        })
    }

    #[inline]
    pub const fn normal(&self) -> Vector3<Real> {
        self.normal
    }

    #[inline]
    pub const fn offset(&self) -> Real {
        self.w
    }

    /// Reverse the orientation in place.
    pub fn flip(&mut self) {
        self.normal = -self.normal;
        self.w = -self.w;
    }

    pub fn flipped(&self) -> Self {
        Plane {
            normal: -self.normal,
            w: -self.w,
        }
    }

    /// `normal · p - w`; positive in front, negative behind.
    #[inline]
    pub fn signed_distance(&self, point: &Point3<Real>) -> Real {
        self.normal.dot(&point.coords) - self.w
    }

    /// Classify a point as [`FRONT`], [`BACK`] or [`COPLANAR`].
    /// `|d| <= epsilon` counts as coplanar.
    #[inline]
    pub fn orient_point(&self, point: &Point3<Real>, epsilon: Real) -> i8 {
        let d = self.signed_distance(point);
        if d < -epsilon {
            BACK
        } else if d > epsilon {
            FRONT
        } else {
            COPLANAR
        }
    }

    /// Classify a whole polygon. Returns the OR of its vertex types.
    pub fn classify_polygon<S: Clone>(&self, polygon: &Polygon<S>, epsilon: Real) -> i8 {
        polygon
            .vertices
            .iter()
            .fold(COPLANAR, |acc, v| acc | self.orient_point(&v.pos, epsilon))
    }

    /// Split `polygon` by this plane into four buckets:
    /// `(coplanar_front, coplanar_back, front, back)`.
    ///
    /// Coplanar polygons are routed by the sign of `polygon normal · plane normal`.
    /// Spanning polygons are cut along the plane; both pieces keep the
    /// original plane and metadata. Pieces that collapse below `epsilon`
    /// are dropped.
    #[allow(clippy::type_complexity)]
    pub fn split_polygon<S: Clone>(
        &self,
        polygon: &Polygon<S>,
        epsilon: Real,
    ) -> (
        Vec<Polygon<S>>,
        Vec<Polygon<S>>,
        Vec<Polygon<S>>,
        Vec<Polygon<S>>,
    ) {
        let mut coplanar_front = Vec::new();
        let mut coplanar_back = Vec::new();
        let mut front = Vec::new();
        let mut back = Vec::new();

        let types: Vec<i8> = polygon
            .vertices
            .iter()
            .map(|v| self.orient_point(&v.pos, epsilon))
            .collect();
        let polygon_type = types.iter().fold(COPLANAR, |acc, &t| acc | t);

        match polygon_type {
            COPLANAR => {
                if self.normal.dot(&polygon.plane.normal) > 0.0 {
                    coplanar_front.push(polygon.clone());
                } else {
                    coplanar_back.push(polygon.clone());
                }
            },
            FRONT => front.push(polygon.clone()),
            BACK => back.push(polygon.clone()),
            _ => {
                let n = polygon.vertices.len();
                let mut split_front = Vec::with_capacity(n + 1);
                let mut split_back = Vec::with_capacity(n + 1);

                for i in 0..n {
                    // j is the vertex following i, wrapping around to close the loop
                    let j = (i + 1) % n;
                    let (type_i, type_j) = (types[i], types[j]);
                    let vertex_i = &polygon.vertices[i];
                    let vertex_j = &polygon.vertices[j];

                    if type_i != BACK {
                        split_front.push(*vertex_i);
                    }
                    if type_i != FRONT {
                        split_back.push(*vertex_i);
                    }

                    // Strictly opposite sides: synthesize the crossing vertex.
                    if (type_i | type_j) == SPANNING {
                        let d_i = self.signed_distance(&vertex_i.pos);
                        let d_j = self.signed_distance(&vertex_j.pos);
                        let t = d_i / (d_i - d_j);
                        let crossing = vertex_i.interpolate(vertex_j, t);
                        split_front.push(crossing);
                        split_back.push(crossing);
                    }
                }

                for (loop_vertices, bucket) in [(split_front, &mut front), (split_back, &mut back)] {
                    let piece = Polygon::from_parts(
                        loop_vertices,
                        polygon.plane.clone(),
                        polygon.metadata.clone(),
                    );
                    if piece.is_degenerate(epsilon) {
                        debug!(
                            vertices = piece.vertices.len(),
                            area = piece.area(),
                            "dropping degenerate split fragment"
                        );
                    } else {
                        bucket.push(piece);
                    }
                }
            },
        }

        (coplanar_front, coplanar_back, front, back)
    }
}
