//! BSP tree storage: an arena of nodes addressed by [`NodeId`].

use crate::float_types::Real;
use crate::mesh::plane::Plane;
use crate::mesh::polygon::Polygon;

/// Handle of a node inside its [`BspTree`]. Only meaningful for the tree
/// that issued it.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) const ROOT: NodeId = NodeId(0);

    #[inline]
    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// A BSP tree node, containing polygons plus optional front/back subtrees
#[derive(Debug, Clone)]
pub struct Node<S: Clone> {
    /// Splitting plane for this node *or* **None** for an empty placeholder.
    pub(crate) plane: Option<Plane>,

    /// Subtree in the *front* half‑space.
    pub(crate) front: Option<NodeId>,

    /// Subtree in the *back* half‑space.
    pub(crate) back: Option<NodeId>,

    /// Polygons lying on `plane`, facing either way.
    pub(crate) polygons: Vec<Polygon<S>>,
}

impl<S: Clone> Node<S> {
    pub(crate) const fn new() -> Self {
        Self {
            plane: None,
            front: None,
            back: None,
            polygons: Vec::new(),
        }
    }

    pub const fn plane(&self) -> Option<&Plane> {
        self.plane.as_ref()
    }

    pub const fn front(&self) -> Option<NodeId> {
        self.front
    }

    pub const fn back(&self) -> Option<NodeId> {
        self.back
    }

    pub fn polygons(&self) -> &[Polygon<S>] {
        &self.polygons
    }
}

/// A solid represented as a BSP tree.
///
/// The arena owns every node; edges are [`NodeId`]s, so there are no
/// cycles and no shared ownership. Node 0 is always the root. Nodes are
/// only ever appended, by [`build`](BspTree::build).
#[derive(Debug, Clone)]
pub struct BspTree<S: Clone> {
    pub(crate) nodes: Vec<Node<S>>,
    pub(crate) epsilon: Real,
}

impl<S: Clone> BspTree<S> {
    /// An empty tree (a single plane-less root) classifying with `epsilon`.
    pub fn new(epsilon: Real) -> Self {
        Self {
            nodes: vec![Node::new()],
            epsilon,
        }
    }

    pub const fn epsilon(&self) -> Real {
        self.epsilon
    }

    pub const fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    pub fn node(&self, id: NodeId) -> &Node<S> {
        &self.nodes[id.idx()]
    }

    /// Number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// `true` while the root has no splitting plane.
    pub fn is_empty(&self) -> bool {
        self.nodes[0].plane.is_none()
    }

    /// Number of polygons stored across all nodes.
    pub fn polygon_count(&self) -> usize {
        self.nodes.iter().map(|n| n.polygons.len()).sum()
    }

    /// Length of the longest root-to-leaf path, counted in nodes.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(NodeId::ROOT, 1)];
        while let Some((id, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            let node = &self.nodes[id.idx()];
            stack.extend(
                [node.front, node.back]
                    .into_iter()
                    .flatten()
                    .map(|child| (child, depth + 1)),
            );
        }
        deepest
    }

    pub(crate) fn push_node(&mut self) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::new());
        id
    }
}
