//! **Constructive Solid Geometry (CSG)** on polygon soups, built around
//! Boolean operations (*union*, *difference*, *intersection*, *xor*) on
//! polygons stored in arena-allocated [BSP](mesh::bsp) trees.
//!
//! The engine lives in [`boolean`]; [`mesh::Mesh`] wraps a polygon list
//! with the [`CSG`] trait, and [`model::Model`] converts indexed,
//! multi-material triangle models to and from polygon soups.
//!
//! ```
//! use csgbsp::{CSG, mesh::Mesh};
//!
//! let a: Mesh<()> = Mesh::cube(1.0, None);
//! let b = Mesh::cube(1.0, None).translate(0.5, 0.0, 0.0);
//! let lens = a.intersection(&b);
//! assert!((lens.volume() - 0.5).abs() < 1e-9);
//! ```
//!
//! # Features
//! #### Default
//! - **f64**: use f64 as Real
//!
//! #### Optional
//! - **f32**: use f32 as Real, this conflicts with f64

#![forbid(unsafe_code)]
#![deny(unused)]
#![warn(clippy::missing_const_for_fn, clippy::approx_constant, clippy::all)]

pub mod aabb;
pub mod boolean;
pub mod errors;
pub mod float_types;
pub mod mesh;
pub mod model;
pub mod traits;

#[cfg(any(
    all(feature = "f64", feature = "f32"),
    not(any(feature = "f64", feature = "f32"))
))]
compile_error!("Either 'f64' or 'f32' feature must be specified, but not both");

pub use aabb::Aabb;
pub use boolean::{BooleanOp, CsgOptions};
pub use errors::CsgError;
pub use mesh::{Mesh, plane::Plane, polygon::Polygon, vertex::Vertex};
pub use model::Model;
pub use traits::CSG;
