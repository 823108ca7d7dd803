//! Indexed triangle models with per-submesh materials, the shape render
//! meshes usually come in, and their conversion to and from polygon soups.

use crate::boolean::{self, BooleanOp, CsgOptions};
use crate::errors::CsgError;
use crate::float_types::Real;
use crate::mesh::polygon::Polygon;
use crate::mesh::vertex::Vertex;
use nalgebra::Vector3;
use tracing::{debug, warn};

/// A shared vertex buffer, one triangle index list per submesh and one
/// material per submesh.
#[derive(Debug, Clone, PartialEq)]
pub struct Model<M> {
    pub vertices: Vec<Vertex>,
    pub submeshes: Vec<Vec<u32>>,
    pub materials: Vec<M>,
}

impl<M: Clone> Model<M> {
    pub const fn new(vertices: Vec<Vertex>, submeshes: Vec<Vec<u32>>, materials: Vec<M>) -> Self {
        Model {
            vertices,
            submeshes,
            materials,
        }
    }

    /// One triangle polygon per indexed triangle, tagged with its submesh index.
    ///
    /// Triangles without area are skipped with a warning. Index lists that
    /// are not whole triangles, indices past the vertex buffer and
    /// non-finite positions are errors.
    pub fn to_polygons(&self) -> Result<Vec<Polygon<usize>>, CsgError> {
        let triangle_count = self.submeshes.iter().map(|s| s.len() / 3).sum();
        let mut polygons = Vec::with_capacity(triangle_count);
        let mut triangle_index = 0;

        for (submesh, indices) in self.submeshes.iter().enumerate() {
            if indices.len() % 3 != 0 {
                return Err(CsgError::NotTriangles { len: indices.len() });
            }
            for triangle in indices.chunks_exact(3) {
                let corners = triangle
                    .iter()
                    .map(|&index| self.vertex(index))
                    .collect::<Result<Vec<_>, _>>()?;
                match Polygon::new(corners, Some(submesh)) {
                    Ok(polygon) => polygons.push(polygon),
                    Err(CsgError::DegeneratePolygon(near)) => {
                        warn!(submesh, triangle = triangle_index, ?near, "skipping degenerate triangle");
                    },
                    Err(err) => return Err(err.at_polygon(triangle_index)),
                }
                triangle_index += 1;
            }
        }

        debug!(triangles = triangle_index, polygons = polygons.len(), "model converted");
        Ok(polygons)
    }

    fn vertex(&self, index: u32) -> Result<Vertex, CsgError> {
        self.vertices
            .get(index as usize)
            .copied()
            .ok_or(CsgError::IndexOutOfRange {
                index: index as usize,
                len: self.vertices.len(),
            })
    }

    /// Fan-triangulate `polygons` into a model. A polygon goes to the
    /// submesh named by its tag; untagged polygons go to submesh 0.
    ///
    /// There is one submesh per material, or more if a tag asks for it.
    /// Vertices are not shared between triangles.
    pub fn from_polygons(polygons: &[Polygon<usize>], materials: Vec<M>) -> Self {
        let highest_tag = polygons.iter().filter_map(|p| p.metadata).max();
        let submesh_count = materials
            .len()
            .max(highest_tag.map_or(0, |tag| tag + 1))
            .max(1);

        let mut vertices = Vec::new();
        let mut submeshes = vec![Vec::new(); submesh_count];
        for polygon in polygons {
            let submesh = &mut submeshes[polygon.metadata.unwrap_or(0)];
            for triangle in polygon.triangulate() {
                for vertex in triangle {
                    submesh.push(vertices.len() as u32);
                    vertices.push(vertex);
                }
            }
        }

        Model {
            vertices,
            submeshes,
            materials,
        }
    }

    /// Move every vertex by `-offset`, so the point at `offset` becomes the
    /// model's origin.
    pub fn center_pivot_by_offset(&mut self, offset: Vector3<Real>) {
        for vertex in &mut self.vertices {
            vertex.pos -= offset;
        }
    }

    /// Run `op` on two models with default options.
    ///
    /// The result carries the materials of `lhs`, padded with
    /// `M::default()` up to its submesh count, followed by those of `rhs`;
    /// triangles from `rhs` are re-tagged to match.
    pub fn perform(op: BooleanOp, lhs: &Model<M>, rhs: &Model<M>) -> Result<Model<M>, CsgError>
    where
        M: Default,
    {
        Self::perform_with(op, lhs, rhs, &CsgOptions::default())
    }

    pub fn perform_with(
        op: BooleanOp,
        lhs: &Model<M>,
        rhs: &Model<M>,
        options: &CsgOptions,
    ) -> Result<Model<M>, CsgError>
    where
        M: Default,
    {
        let a = lhs.to_polygons()?;
        let mut b = rhs.to_polygons()?;
        let base = lhs.submeshes.len().max(lhs.materials.len());
        for polygon in &mut b {
            polygon.metadata = polygon.metadata.map(|tag| tag + base);
        }

        let polygons = boolean::perform_with(op, &a, &b, options)?;
        let mut materials = lhs.materials.clone();
        materials.resize_with(base, M::default);
        materials.extend(rhs.materials.iter().cloned());
        Ok(Model::from_polygons(&polygons, materials))
    }
}
