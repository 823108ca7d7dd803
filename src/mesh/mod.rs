//! `Mesh` struct and implementations of the `CSG` trait for `Mesh`

use crate::aabb::Aabb;
use crate::boolean;
use crate::errors::CsgError;
use crate::float_types::{Real, tolerance};
use crate::mesh::{plane::Plane, polygon::Polygon, vertex::Vertex};
use crate::traits::CSG;
use nalgebra::{Matrix4, Point3};
use std::sync::OnceLock;
use tracing::warn;

pub mod bsp;
pub mod manifold;
pub mod plane;
pub mod polygon;
pub mod shapes;
pub mod vertex;

/// A closed (or open) polygon soup with an optional mesh-wide tag.
#[derive(Clone, Debug)]
pub struct Mesh<S: Clone> {
    /// 3D polygons for volumetric shapes
    pub polygons: Vec<Polygon<S>>,

    /// Lazily calculated AABB that spans `polygons`.
    pub bounding_box: OnceLock<Aabb>,

    /// Metadata
    pub metadata: Option<S>,
}

impl<S: Clone> Mesh<S> {
    /// Build a Mesh from an existing polygon list
    pub fn from_polygons(polygons: &[Polygon<S>], metadata: Option<S>) -> Self {
        Mesh {
            polygons: polygons.to_vec(),
            bounding_box: OnceLock::new(),
            metadata,
        }
    }

    /// Build a Mesh from raw vertex loops, each tagged with `metadata`.
    ///
    /// A loop with fewer than three vertices or a non-finite coordinate is
    /// an error carrying the loop's index. Loops without area are dropped
    /// with a warning. Loops further from planar than the process-wide
    /// [`tolerance`] are kept, also with a warning.
    pub fn try_from_loops(
        loops: Vec<Vec<Vertex>>,
        metadata: Option<S>,
    ) -> Result<Self, CsgError> {
        let epsilon = tolerance();
        let mut polygons = Vec::with_capacity(loops.len());

        for (index, vertices) in loops.into_iter().enumerate() {
            let polygon = match Polygon::new(vertices, metadata.clone()) {
                Ok(polygon) => polygon,
                Err(CsgError::DegeneratePolygon(near)) => {
                    warn!(index, ?near, "dropping loop without area");
                    continue;
                },
                Err(err) => return Err(err.at_polygon(index)),
            };
            if polygon.area() <= epsilon * epsilon {
                warn!(index, area = polygon.area(), "dropping loop without area");
                continue;
            }
            let deviation = polygon.max_plane_deviation();
            if deviation > epsilon {
                warn!(index, deviation, "loop is not planar within tolerance");
            }
            polygons.push(polygon);
        }

        Ok(Mesh {
            polygons,
            bounding_box: OnceLock::new(),
            metadata,
        })
    }

    /// Helper to collect all vertices from the Mesh.
    pub fn vertices(&self) -> Vec<Vertex> {
        self.polygons
            .iter()
            .flat_map(|p| p.vertices.iter().copied())
            .collect()
    }

    /// Total number of polygon corners (shared corners counted per polygon).
    pub fn vertex_count(&self) -> usize {
        self.polygons.iter().map(|p| p.vertices.len()).sum()
    }

    /// Triangulate each polygon in the Mesh returning a Mesh containing triangles
    pub fn triangulate(&self) -> Mesh<S> {
        let triangles = self
            .polygons
            .iter()
            .flat_map(|poly| {
                poly.triangulate().into_iter().map(move |triangle| {
                    Polygon::from_parts(triangle.to_vec(), poly.plane.clone(), poly.metadata.clone())
                })
            })
            .collect::<Vec<_>>();

        Mesh::from_polygons(&triangles, self.metadata.clone())
    }

    /// Volume enclosed by the surface, positive when the winding faces out.
    pub fn signed_volume(&self) -> Real {
        signed_volume_of(&self.polygons)
    }

    pub fn volume(&self) -> Real {
        self.signed_volume().abs()
    }

    pub fn surface_area(&self) -> Real {
        self.polygons.iter().map(Polygon::area).sum()
    }
}

/// Divergence theorem over the fan triangles of `polygons`: the sum of the
/// signed tetrahedra spanned by each triangle and the origin.
pub(crate) fn signed_volume_of<S: Clone>(polygons: &[Polygon<S>]) -> Real {
    polygons
        .iter()
        .flat_map(|poly| poly.triangulate())
        .map(|[a, b, c]| a.pos.coords.dot(&b.pos.coords.cross(&c.pos.coords)) / 6.0)
        .sum()
}

impl<S: Clone> CSG for Mesh<S> {
    /// Returns a new empty Mesh
    fn new() -> Self {
        Mesh {
            polygons: Vec::new(),
            bounding_box: OnceLock::new(),
            metadata: None,
        }
    }

    /// Return a new Mesh representing union of the two Meshes.
    ///
    /// ```text
    /// let c = a.union(b);
    ///     +-------+            +-------+
    ///     |       |            |       |
    ///     |   a   |            |   c   |
    ///     |    +--+----+   =   |       +----+
    ///     +----+--+    |       +----+       |
    ///          |   b   |            |   c   |
    ///          |       |            |       |
    ///          +-------+            +-------+
    /// ```
    fn union(&self, other: &Mesh<S>) -> Mesh<S> {
        Mesh {
            polygons: boolean::union(&self.polygons, &other.polygons),
            bounding_box: OnceLock::new(),
            metadata: self.metadata.clone(),
        }
    }

    /// Return a new Mesh representing difference of the two Meshes.
    ///
    /// ```text
    /// let c = a.difference(b);
    ///     +-------+            +-------+
    ///     |       |            |       |
    ///     |   a   |            |   c   |
    ///     |    +--+----+   =   |    +--+
    ///     +----+--+    |       +----+
    ///          |   b   |
    ///          |       |
    ///          +-------+
    /// ```
    fn difference(&self, other: &Mesh<S>) -> Mesh<S> {
        Mesh {
            polygons: boolean::subtract(&self.polygons, &other.polygons),
            bounding_box: OnceLock::new(),
            metadata: self.metadata.clone(),
        }
    }

    /// Return a new Mesh representing intersection of the two Meshes.
    ///
    /// ```text
    /// let c = a.intersect(b);
    ///     +-------+
    ///     |       |
    ///     |   a   |
    ///     |    +--+----+   =   +--+
    ///     +----+--+    |       +--+
    ///          |   b   |
    ///          |       |
    ///          +-------+
    /// ```
    fn intersection(&self, other: &Mesh<S>) -> Mesh<S> {
        Mesh {
            polygons: boolean::intersect(&self.polygons, &other.polygons),
            bounding_box: OnceLock::new(),
            metadata: self.metadata.clone(),
        }
    }

    /// Return a new Mesh representing space in this Mesh excluding the space in the
    /// other Mesh plus the space in the other Mesh excluding the space in this Mesh.
    fn xor(&self, other: &Mesh<S>) -> Mesh<S> {
        Mesh {
            polygons: boolean::xor(&self.polygons, &other.polygons),
            bounding_box: OnceLock::new(),
            metadata: self.metadata.clone(),
        }
    }

    /// Apply an arbitrary 3D transform (as a 4x4 matrix) to the mesh.
    ///
    /// Mirroring transforms reverse the winding so the surface keeps facing
    /// out. Polygons that collapse under a singular transform are dropped.
    fn transform(&self, mat: &Matrix4<Real>) -> Mesh<S> {
        let normal_matrix = mat.try_inverse().map(|inv| inv.transpose());
        let mirrors = mat.fixed_view::<3, 3>(0, 0).determinant() < 0.0;

        let mut polygons = Vec::with_capacity(self.polygons.len());
        for poly in &self.polygons {
            let mut vertices = poly.vertices.clone();
            for vert in &mut vertices {
                vert.pos = mat.transform_point(&vert.pos);
                if let Some(normal_matrix) = &normal_matrix {
                    vert.normal = normal_matrix
                        .transform_vector(&vert.normal)
                        .try_normalize(Real::EPSILON)
                        .unwrap_or(vert.normal);
                }
            }
            if mirrors {
                vertices.reverse();
            }

            // keep the cached plane consistent with the new vertex positions
            match Plane::from_vertices(&vertices) {
                Ok(plane) => {
                    polygons.push(Polygon::from_parts(vertices, plane, poly.metadata.clone()))
                },
                Err(err) => warn!(%err, "polygon collapsed under transform, dropping it"),
            }
        }

        Mesh {
            polygons,
            bounding_box: OnceLock::new(),
            metadata: self.metadata.clone(),
        }
    }

    /// Returns an [`Aabb`] indicating the 3D bounds of all `polygons`.
    fn bounding_box(&self) -> Aabb {
        *self.bounding_box.get_or_init(|| {
            let aabb = Aabb::from_points(
                self.polygons
                    .iter()
                    .flat_map(|p| p.vertices.iter().map(|v| v.pos)),
            );
            // no polygons: a trivial box at the origin
            if aabb.is_empty() {
                Aabb::new(Point3::origin(), Point3::origin())
            } else {
                aabb
            }
        })
    }

    /// Invalidates object's cached bounding box.
    fn invalidate_bounding_box(&mut self) {
        self.bounding_box = OnceLock::new();
    }

    /// Invert this Mesh (flip inside vs. outside)
    fn inverse(&self) -> Mesh<S> {
        let mut mesh = self.clone();
        for p in &mut mesh.polygons {
            p.flip();
        }
        mesh
    }
}
