mod support;

use csgbsp::{
    errors::CsgError,
    float_types::DEFAULT_TOLERANCE,
    mesh::{
        plane::{BACK, COPLANAR, FRONT, Plane, SPANNING},
        vertex::Vertex,
    },
};
use nalgebra::{Point3, Vector3};

use crate::support::make_polygon_3d;

#[test]
fn flip() {
    let mut plane = Plane::from_normal(Vector3::y(), 2.0);
    plane.flip();
    assert_eq!(plane.normal(), Vector3::new(0.0, -1.0, 0.0));
    assert_eq!(plane.offset(), -2.0);
}

#[test]
fn from_normal_normalizes() {
    let plane = Plane::from_normal(Vector3::new(0.0, 0.0, 4.0), 1.0);
    assert_eq!(plane.normal(), Vector3::z());
    assert_eq!(plane.signed_distance(&Point3::new(3.0, 3.0, 3.0)), 2.0);
}

#[test]
fn classify_polygon_ors_vertex_types() {
    let plane = Plane::from_normal(Vector3::y(), 0.0);
    let above = make_polygon_3d(&[[0.0, 1.0, 0.0], [1.0, 1.0, 0.0], [0.0, 2.0, 0.0]]);
    let below = make_polygon_3d(&[[0.0, -2.0, 0.0], [1.0, -2.0, 0.0], [0.0, -1.0, 0.0]]);
    let across = make_polygon_3d(&[[0.0, -1.0, 0.0], [1.0, -1.0, 0.0], [0.0, 1.0, 0.0]]);
    let on = make_polygon_3d(&[[0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0, 0.0]]);

    assert_eq!(plane.classify_polygon(&above, DEFAULT_TOLERANCE), FRONT);
    assert_eq!(plane.classify_polygon(&below, DEFAULT_TOLERANCE), BACK);
    assert_eq!(plane.classify_polygon(&across, DEFAULT_TOLERANCE), SPANNING);
    assert_eq!(plane.classify_polygon(&on, DEFAULT_TOLERANCE), COPLANAR);
}

#[test]
fn split_polygon() {
    // A plane that splits the XY plane at y=0
    let plane = Plane::from_normal(Vector3::new(0.0, 1.0, 0.0), 0.0);
    let poly = make_polygon_3d(&[
        [-1.0, -1.0, 0.0],
        [1.0, -1.0, 0.0],
        [1.0, 1.0, 0.0],
        [-1.0, 1.0, 0.0],
    ]);

    let (cf, cb, f, b) = plane.split_polygon(&poly, DEFAULT_TOLERANCE);
    assert_eq!(cf.len(), 0);
    assert_eq!(cb.len(), 0);
    assert_eq!(f.len(), 1);
    assert_eq!(b.len(), 1);

    for v in &f[0].vertices {
        assert!(v.pos.y >= -DEFAULT_TOLERANCE);
    }
    for v in &b[0].vertices {
        assert!(v.pos.y <= DEFAULT_TOLERANCE);
    }
    // fragments keep the plane of the polygon they were cut from
    assert_eq!(f[0].plane, poly.plane);
    assert_eq!(b[0].plane, poly.plane);
}

#[test]
fn split_interpolates_normals_and_uvs() {
    let plane = Plane::from_normal(Vector3::x(), 0.5);
    let poly = csgbsp::Polygon::<()>::new(
        vec![
            Vertex::with_uv(Point3::new(0.0, 0.0, 0.0), Vector3::z(), nalgebra::Vector2::new(0.0, 0.0)),
            Vertex::with_uv(Point3::new(1.0, 0.0, 0.0), Vector3::z(), nalgebra::Vector2::new(1.0, 0.0)),
            Vertex::with_uv(Point3::new(0.0, 1.0, 0.0), Vector3::z(), nalgebra::Vector2::new(0.0, 1.0)),
        ],
        None,
    )
    .unwrap();
    let (_, _, f, _) = plane.split_polygon(&poly, DEFAULT_TOLERANCE);
    let crossing = f[0]
        .vertices
        .iter()
        .find(|v| v.pos == Point3::new(0.5, 0.0, 0.0))
        .expect("crossing on the x axis edge");
    assert_eq!(crossing.uv, Some(nalgebra::Vector2::new(0.5, 0.0)));
    assert_eq!(crossing.normal, Vector3::z());
}

#[test]
fn from_vertices_rejects_degenerate_loops() {
    let points = [
        Vertex::new(Point3::origin(), Vector3::z()),
        Vertex::new(Point3::new(1.0, 1.0, 1.0), Vector3::z()),
        Vertex::new(Point3::new(2.0, 2.0, 2.0), Vector3::z()),
    ];
    assert!(matches!(
        Plane::from_vertices(&points),
        Err(CsgError::DegeneratePolygon(_))
    ));
    assert_eq!(
        Plane::from_vertices(&points[..2]),
        Err(CsgError::TooFewVertices { count: 2 })
    );
}
