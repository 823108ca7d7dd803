//! Errors reported to callers of the engine.
//!
//! Only structurally invalid input is surfaced here. Geometric anomalies that
//! appear while splitting (slivers, collapsed fragments) are filtered and
//! logged instead.

use crate::float_types::Real;
use nalgebra::Point3;

/// All the caller-visible failures of the crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CsgError {
    /// A polygon needs at least three vertices.
    #[error("(TooFewVertices) a polygon needs at least 3 vertices, got {count}")]
    TooFewVertices { count: usize },

    /// The vertices do not span a plane (collinear or coincident).
    #[error("(DegeneratePolygon) vertices do not define a plane near {0}")]
    DegeneratePolygon(Point3<Real>),

    /// A coordinate is NaN or infinite.
    #[error("(NonFiniteCoordinate) the coordinate {0} has a NaN or infinite component")]
    NonFiniteCoordinate(Point3<Real>),

    /// One polygon of a list failed validation.
    #[error("polygon {index} is invalid: {source}")]
    InvalidPolygon {
        index: usize,
        #[source]
        source: Box<CsgError>,
    },

    /// Tolerances must be finite and strictly positive.
    #[error("(InvalidTolerance) tolerance must be finite and > 0, got {0}")]
    InvalidTolerance(Real),

    /// A model index points past the end of its vertex buffer.
    #[error("(IndexOutOfRange) vertex index {index} out of range (vertices.len = {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// A submesh index list is not a whole number of triangles.
    #[error("(NotTriangles) index count {len} is not a multiple of 3")]
    NotTriangles { len: usize },
}

impl CsgError {
    /// Attach the index of the offending polygon.
    pub fn at_polygon(self, index: usize) -> Self {
        CsgError::InvalidPolygon {
            index,
            source: Box::new(self),
        }
    }
}
