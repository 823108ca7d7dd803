use approx::assert_relative_eq;
use csgbsp::{
    boolean::BooleanOp,
    float_types::Real,
    mesh::Mesh,
    model::Model,
    traits::CSG,
};
use nalgebra::Vector3;

/// Unit cube model with one submesh, translated by `(x, y, z)`.
fn cube_model(x: Real, y: Real, z: Real, material: &'static str) -> Model<&'static str> {
    let cube: Mesh<usize> = Mesh::cube(1.0, Some(0)).translate(x, y, z);
    Model::from_polygons(&cube.polygons, vec![material])
}

fn model_volume<M: Clone>(model: &Model<M>) -> Real {
    let polygons = model.to_polygons().expect("valid model");
    Mesh::from_polygons(&polygons, None).signed_volume()
}

#[test]
fn from_polygons_fan_triangulates() {
    let model = cube_model(0.0, 0.0, 0.0, "red");
    assert_eq!(model.submeshes.len(), 1);
    assert_eq!(model.submeshes[0].len(), 12 * 3);
    assert_eq!(model.vertices.len(), 36);

    let polygons = model.to_polygons().unwrap();
    assert_eq!(polygons.len(), 12);
    assert!(polygons.iter().all(|p| p.metadata == Some(0)));
    assert_relative_eq!(model_volume(&model), 1.0, epsilon = 1e-12);
}

#[test]
fn untagged_polygons_land_in_the_first_submesh() {
    let cube: Mesh<usize> = Mesh::cube(1.0, None);
    let model = Model::from_polygons(&cube.polygons, vec!["only", "unused"]);
    assert_eq!(model.submeshes.len(), 2);
    assert_eq!(model.submeshes[0].len(), 36);
    assert!(model.submeshes[1].is_empty());
}

#[test]
fn perform_concatenates_materials() {
    let lhs = cube_model(0.0, 0.0, 0.0, "red");
    let rhs = cube_model(0.5, 0.5, 0.5, "blue");

    let result = Model::perform(BooleanOp::Subtraction, &lhs, &rhs).unwrap();
    assert_eq!(result.materials, vec!["red", "blue"]);
    assert_eq!(result.submeshes.len(), 2);
    assert!(!result.submeshes[0].is_empty());
    // the walls of the notch are cut from the rhs
    assert!(!result.submeshes[1].is_empty());
    assert_relative_eq!(model_volume(&result), 0.875, epsilon = 1e-9);

    let result = Model::perform(BooleanOp::Union, &lhs, &rhs).unwrap();
    assert_relative_eq!(model_volume(&result), 1.875, epsilon = 1e-9);

    let result = Model::perform(BooleanOp::Intersection, &lhs, &rhs).unwrap();
    assert_relative_eq!(model_volume(&result), 0.125, epsilon = 1e-9);
}

#[test]
fn disjoint_intersection_is_an_empty_model() {
    let lhs = cube_model(0.0, 0.0, 0.0, "red");
    let rhs = cube_model(4.0, 0.0, 0.0, "blue");
    let result = Model::perform(BooleanOp::Intersection, &lhs, &rhs).unwrap();
    assert!(result.vertices.is_empty());
    assert!(result.submeshes.iter().all(Vec::is_empty));
    assert_eq!(result.materials, vec!["red", "blue"]);
}

#[test]
fn pivot_then_subtract() {
    let mut plate = cube_model(2.0, 2.0, 0.0, "plate");
    plate.center_pivot_by_offset(Vector3::new(2.0, 2.0, 0.0));
    let cutter = cube_model(0.5, 0.0, 0.0, "cutter");

    let trimmed = Model::perform(BooleanOp::Subtraction, &plate, &cutter).unwrap();
    assert_relative_eq!(model_volume(&trimmed), 0.5, epsilon = 1e-9);
}

#[test]
fn rhs_triangles_keep_their_material_when_lhs_counts_differ() {
    // lhs has a second, unused material
    let mut lhs = cube_model(0.0, 0.0, 0.0, "red");
    lhs.materials.push("spare");
    let rhs = cube_model(0.5, 0.5, 0.5, "blue");

    let result = Model::perform(BooleanOp::Subtraction, &lhs, &rhs).unwrap();
    assert_eq!(result.materials, vec!["red", "spare", "blue"]);
    assert_eq!(result.submeshes.len(), 3);
    assert!(result.submeshes[1].is_empty());
    assert!(!result.submeshes[2].is_empty());

    // lhs has a submesh without a material
    let mut lhs = cube_model(0.0, 0.0, 0.0, "red");
    lhs.submeshes.push(Vec::new());
    let result = Model::perform(BooleanOp::Subtraction, &lhs, &rhs).unwrap();
    assert_eq!(result.materials, vec!["red", "", "blue"]);
    assert!(result.submeshes[1].is_empty());
    assert!(!result.submeshes[2].is_empty());
}
