//! Binary Space Partitioning (BSP) trees over convex polygons.
//!
//! Nodes live in an arena owned by [`BspTree`] and are linked by [`NodeId`]
//! handles. The algebra (build, invert, clip, flatten) lives in `serial`;
//! the choice of splitting plane is pluggable through
//! [`SplittingPlaneStrategy`].

pub mod node;
pub mod serial;
pub mod traits;

pub use node::{BspTree, Node, NodeId};
pub use traits::{
    BalancedSplittingStrategy, FirstPolygon, PlaneSelection, SplittingPlaneStrategy,
};
