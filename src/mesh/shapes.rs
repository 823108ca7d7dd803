//! Primitive solids as `Mesh`es.

use crate::float_types::Real;
use crate::mesh::Mesh;
use crate::mesh::plane::Plane;
use crate::mesh::polygon::Polygon;
use crate::mesh::vertex::Vertex;
use nalgebra::{Point3, Vector3};
use std::sync::OnceLock;

impl<S: Clone> Mesh<S> {
    /// Axis-aligned box spanning `[0, width] × [0, length] × [0, height]`.
    ///
    /// ```text
    ///     4-------5
    ///    /|      /|
    ///   0-------1 |
    ///   | |     | |
    ///   | 7-----|-6
    ///   |/      |/
    ///   3-------2
    /// ```
    ///
    /// Faces wind counter-clockwise seen from outside:
    /// - Bottom [0,3,2,1] (z=0, normal -Z)
    /// - Top [4,5,6,7] (z=height, normal +Z)
    /// - Front [0,1,5,4] (y=0, normal -Y)
    /// - Back [3,7,6,2] (y=length, normal +Y)
    /// - Left [0,4,7,3] (x=0, normal -X)
    /// - Right [1,2,6,5] (x=width, normal +X)
    pub fn cuboid(width: Real, length: Real, height: Real, metadata: Option<S>) -> Mesh<S> {
        let corners = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(width, 0.0, 0.0),
            Point3::new(width, length, 0.0),
            Point3::new(0.0, length, 0.0),
            Point3::new(0.0, 0.0, height),
            Point3::new(width, 0.0, height),
            Point3::new(width, length, height),
            Point3::new(0.0, length, height),
        ];

        let face_definitions = [
            ([0, 3, 2, 1], -Vector3::z()),
            ([4, 5, 6, 7], Vector3::z()),
            ([0, 1, 5, 4], -Vector3::y()),
            ([3, 7, 6, 2], Vector3::y()),
            ([0, 4, 7, 3], -Vector3::x()),
            ([1, 2, 6, 5], Vector3::x()),
        ];

        let polygons = face_definitions
            .iter()
            .map(|(indices, normal)| {
                let vertices = indices
                    .iter()
                    .map(|&i| Vertex::new(corners[i], *normal))
                    .collect();
                let plane = Plane::from_normal(*normal, normal.dot(&corners[indices[0]].coords));
                Polygon::from_parts(vertices, plane, metadata.clone())
            })
            .collect();

        Mesh {
            polygons,
            bounding_box: OnceLock::new(),
            metadata,
        }
    }

    pub fn cube(width: Real, metadata: Option<S>) -> Mesh<S> {
        Self::cuboid(width, width, width, metadata)
    }
}
