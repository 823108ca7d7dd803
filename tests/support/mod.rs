//! Test support library
//! Provides various helper functions & utilities for tests.

use csgbsp::{
    float_types::Real,
    mesh::{Mesh, polygon::Polygon, vertex::Vertex},
    traits::CSG,
};
use nalgebra::{Point3, Vector3};

/// Returns the approximate bounding box `[min_x, min_y, min_z, max_x, max_y, max_z]`
/// for a set of polygons.
pub fn bounding_box<S: Clone>(polygons: &[Polygon<S>]) -> [Real; 6] {
    let mut min_x = Real::MAX;
    let mut min_y = Real::MAX;
    let mut min_z = Real::MAX;
    let mut max_x = Real::MIN;
    let mut max_y = Real::MIN;
    let mut max_z = Real::MIN;

    for poly in polygons {
        for v in &poly.vertices {
            let p = v.pos;
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            min_z = min_z.min(p.z);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
            max_z = max_z.max(p.z);
        }
    }

    [min_x, min_y, min_z, max_x, max_y, max_z]
}

/// Quick helper to compare floating-point results with an acceptable tolerance.
pub fn approx_eq(a: Real, b: Real, eps: Real) -> bool {
    (a - b).abs() < eps
}

/// Helper to make a simple Polygon in 3D with given vertices.
pub fn make_polygon_3d(points: &[[Real; 3]]) -> Polygon<()> {
    let mut verts = Vec::new();
    for p in points {
        let pos = Point3::new(p[0], p[1], p[2]);
        // The plane comes from the winding; the vertex normal is only carried along.
        verts.push(Vertex::new(pos, Vector3::z()));
    }
    Polygon::new(verts, None).expect("test polygon should be valid")
}

/// Unit cube with its minimum corner at `(x, y, z)`.
pub fn unit_cube_at(x: Real, y: Real, z: Real) -> Mesh<()> {
    Mesh::cube(1.0, None).translate(x, y, z)
}

/// Asserts two `bounding_box` results agree within `eps` on every bound.
pub fn assert_bounds(actual: [Real; 6], expected: [Real; 6], eps: Real) {
    for (a, e) in actual.iter().zip(expected.iter()) {
        assert!(approx_eq(*a, *e, eps), "bounds {actual:?} != {expected:?}");
    }
}
