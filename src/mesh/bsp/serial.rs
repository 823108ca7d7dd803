//! Tree algebra on [`BspTree`]: build, invert, clip and flatten.
//!
//! Every traversal uses an explicit worklist, so a degenerate chain of
//! `n` nodes costs `O(n)` heap, never `O(n)` call stack.

use crate::mesh::bsp::node::{BspTree, NodeId};
use crate::mesh::bsp::traits::{FirstPolygon, SplittingPlaneStrategy};
use crate::mesh::polygon::Polygon;
use crate::float_types::Real;
use tracing::trace;

impl<S: Clone> BspTree<S> {
    /// Build a tree from `polygons`, splitting on the first remaining polygon at every node.
    pub fn from_polygons(polygons: Vec<Polygon<S>>, epsilon: Real) -> Self {
        let mut tree = Self::new(epsilon);
        tree.build(polygons);
        tree
    }

    /// Insert `polygons` into the tree, using [`FirstPolygon`] for new nodes.
    pub fn build(&mut self, polygons: Vec<Polygon<S>>) {
        self.build_with(polygons, &FirstPolygon);
    }

    /// Insert `polygons` into the tree. Nodes that already have a plane keep
    /// it; plane-less nodes take theirs from the polygon `strategy` picks,
    /// which is stored there unsplit.
    pub fn build_with(
        &mut self,
        polygons: Vec<Polygon<S>>,
        strategy: &dyn SplittingPlaneStrategy<S>,
    ) {
        let epsilon = self.epsilon;
        let mut work = vec![(NodeId::ROOT, polygons)];

        while let Some((id, mut polys)) = work.pop() {
            if polys.is_empty() {
                continue;
            }

            let node = &mut self.nodes[id.idx()];
            let plane = if let Some(plane) = node.plane.clone() {
                plane
            } else {
                let chosen = strategy
                    .pick_splitting_polygon(&polys, epsilon)
                    .min(polys.len() - 1);
                let seed = polys.remove(chosen);
                let plane = seed.plane.clone();
                node.plane = Some(plane.clone());
                node.polygons.push(seed);
                plane
            };

            let mut front = Vec::with_capacity(polys.len() / 2);
            let mut back = Vec::with_capacity(polys.len() / 2);
            for polygon in &polys {
                let (coplanar_front, coplanar_back, front_parts, back_parts) =
                    plane.split_polygon(polygon, epsilon);
                node.polygons.extend(coplanar_front);
                node.polygons.extend(coplanar_back);
                front.extend(front_parts);
                back.extend(back_parts);
            }
            trace!(
                node = id.idx(),
                stored = node.polygons.len(),
                front = front.len(),
                back = back.len(),
                "bsp build step"
            );

            if !front.is_empty() {
                let child = match self.nodes[id.idx()].front {
                    Some(child) => child,
                    None => {
                        let child = self.push_node();
                        self.nodes[id.idx()].front = Some(child);
                        child
                    },
                };
                work.push((child, front));
            }
            if !back.is_empty() {
                let child = match self.nodes[id.idx()].back {
                    Some(child) => child,
                    None => {
                        let child = self.push_node();
                        self.nodes[id.idx()].back = Some(child);
                        child
                    },
                };
                work.push((child, back));
            }
        }
    }

    /// Turn the solid inside out: flip every plane and polygon and swap
    /// the front/back children of every node.
    pub fn invert(&mut self) {
        for node in &mut self.nodes {
            node.polygons.iter_mut().for_each(|p| p.flip());
            if let Some(plane) = node.plane.as_mut() {
                plane.flip();
            }
            std::mem::swap(&mut node.front, &mut node.back);
        }
    }

    /// Remove every part of `polygons` that lies inside this solid.
    ///
    /// A plane-less node keeps whatever reaches it. Polygons that end up
    /// behind a node with no back child are inside and dropped.
    pub fn clip_polygons(&self, polygons: Vec<Polygon<S>>) -> Vec<Polygon<S>> {
        let epsilon = self.epsilon;
        let mut result = Vec::new();
        let mut work = vec![(NodeId::ROOT, polygons)];

        while let Some((id, polys)) = work.pop() {
            let node = &self.nodes[id.idx()];
            let Some(plane) = node.plane.as_ref() else {
                result.extend(polys);
                continue;
            };

            let mut front = Vec::with_capacity(polys.len());
            let mut back = Vec::with_capacity(polys.len());
            for polygon in &polys {
                let (coplanar_front, coplanar_back, front_parts, back_parts) =
                    plane.split_polygon(polygon, epsilon);
                front.extend(coplanar_front);
                front.extend(front_parts);
                back.extend(coplanar_back);
                back.extend(back_parts);
            }

            match node.front {
                Some(child) if !front.is_empty() => work.push((child, front)),
                Some(_) => {},
                None => result.extend(front),
            }
            match node.back {
                Some(child) if !back.is_empty() => work.push((child, back)),
                Some(_) => {},
                None if !back.is_empty() => {
                    trace!(node = id.idx(), dropped = back.len(), "clipped inside polygons");
                },
                None => {},
            }
        }

        result
    }

    /// Replace the polygons of every node with what survives clipping
    /// against `other`: this solid loses everything inside `other`.
    pub fn clip_to(&mut self, other: &BspTree<S>) {
        for node in &mut self.nodes {
            if node.polygons.is_empty() {
                continue;
            }
            let polygons = std::mem::take(&mut node.polygons);
            node.polygons = other.clip_polygons(polygons);
        }
    }

    /// Depth-first (node, front, back) flatten of all stored polygons.
    pub fn all_polygons(&self) -> Vec<Polygon<S>> {
        let mut result = Vec::with_capacity(self.polygon_count());
        for id in self.preorder() {
            result.extend_from_slice(&self.nodes[id.idx()].polygons);
        }
        result
    }

    /// Like [`all_polygons`](Self::all_polygons) but moves the polygons out.
    pub fn into_polygons(mut self) -> Vec<Polygon<S>> {
        let mut result = Vec::with_capacity(self.polygon_count());
        for id in self.preorder() {
            result.append(&mut self.nodes[id.idx()].polygons);
        }
        result
    }

    fn preorder(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![NodeId::ROOT];
        while let Some(id) = stack.pop() {
            order.push(id);
            let node = &self.nodes[id.idx()];
            // back first so the front subtree is visited first
            stack.extend(node.back);
            stack.extend(node.front);
        }
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::bsp::traits::{BalancedSplittingStrategy, PlaneSelection};
    use crate::mesh::plane::Plane;
    use crate::mesh::vertex::Vertex;
    use nalgebra::{Point3, Vector3};

    const EPS: Real = 1e-5;

    fn square(z: Real, tag: u32) -> Polygon<u32> {
        Polygon::new(
            vec![
                Vertex::new(Point3::new(0.0, 0.0, z), Vector3::z()),
                Vertex::new(Point3::new(1.0, 0.0, z), Vector3::z()),
                Vertex::new(Point3::new(1.0, 1.0, z), Vector3::z()),
                Vertex::new(Point3::new(0.0, 1.0, z), Vector3::z()),
            ],
            Some(tag),
        )
        .expect("valid square")
    }

    fn vertical(x: Real) -> Polygon<u32> {
        Polygon::new(
            vec![
                Vertex::new(Point3::new(x, -1.0, -1.0), Vector3::x()),
                Vertex::new(Point3::new(x, 2.0, -1.0), Vector3::x()),
                Vertex::new(Point3::new(x, 2.0, 2.0), Vector3::x()),
                Vertex::new(Point3::new(x, -1.0, 2.0), Vector3::x()),
            ],
            Some(99),
        )
        .expect("valid quad")
    }

    #[test]
    fn empty_build_is_noop() {
        let tree: BspTree<u32> = BspTree::from_polygons(Vec::new(), EPS);
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 1);
        assert!(tree.all_polygons().is_empty());
    }

    #[test]
    fn coplanar_polygons_share_a_node() {
        let mut flipped = square(0.0, 2);
        flipped.flip();
        let tree = BspTree::from_polygons(vec![square(0.0, 1), flipped], EPS);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.node(tree.root()).polygons().len(), 2);
    }

    #[test]
    fn children_created_only_when_needed() {
        let tree = BspTree::from_polygons(vec![square(0.0, 0), square(1.0, 1)], EPS);
        let root = tree.node(tree.root());
        assert!(root.front().is_some());
        assert!(root.back().is_none());
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn spanning_polygon_is_split_into_both_children() {
        let tree = BspTree::from_polygons(vec![vertical(0.5), square(0.0, 1)], EPS);
        let root = tree.node(tree.root());
        assert!(root.front().is_some() && root.back().is_some());
        let all = tree.all_polygons();
        assert_eq!(all.len(), 3);
        let area: Real = all.iter().filter(|p| p.metadata == Some(1)).map(|p| p.area()).sum();
        assert!((area - 1.0).abs() < 1e-12, "surface area is preserved across splits");
    }

    #[test]
    fn deep_chain_does_not_overflow_stack() {
        let count: u32 = 2_000;
        let polygons: Vec<_> = (0..count).map(|i| square(i as Real, i)).collect();
        let mut tree = BspTree::from_polygons(polygons, EPS);
        assert_eq!(tree.depth(), count as usize);

        tree.invert();
        // below every plane: in front of the inverted root, which has no front child
        let kept = tree.clip_polygons(vec![square(-0.5, 0)]);
        assert_eq!(kept.len(), 1);
        let flattened = tree.into_polygons();
        assert_eq!(flattened.len(), count as usize);
        assert_eq!(flattened[0].metadata, Some(0));
    }

    #[test]
    fn invert_twice_restores_tree() {
        let original = BspTree::from_polygons(vec![vertical(0.5), square(0.0, 1)], EPS);
        let mut tree = original.clone();
        tree.invert();
        let root = tree.node(tree.root());
        assert_eq!(
            root.plane().map(Plane::normal),
            original.node(original.root()).plane().map(|p| -p.normal())
        );
        tree.invert();
        assert_eq!(tree.all_polygons(), original.all_polygons());
    }

    #[test]
    fn clip_drops_back_side_without_child() {
        // A single plane z = 0 facing +z: its back half-space is "inside".
        let tree = BspTree::from_polygons(vec![square(0.0, 0)], EPS);
        let kept = tree.clip_polygons(vec![vertical(0.5)]);
        assert_eq!(kept.len(), 1);
        for v in &kept[0].vertices {
            assert!(v.pos.z >= -EPS);
        }
    }

    #[test]
    fn clip_with_empty_tree_keeps_everything() {
        let tree: BspTree<u32> = BspTree::new(EPS);
        let kept = tree.clip_polygons(vec![square(0.0, 0), square(3.0, 1)]);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn balanced_strategy_builds_same_surface() {
        let polygons = vec![square(0.0, 0), vertical(0.5), square(1.0, 1), vertical(0.25)];
        let mut balanced = BspTree::new(EPS);
        balanced.build_with(
            polygons.clone(),
            &PlaneSelection::Balanced(BalancedSplittingStrategy::default()),
        );
        let first = BspTree::from_polygons(polygons, EPS);
        let area = |ps: Vec<Polygon<u32>>| ps.iter().map(|p| p.area()).sum::<Real>();
        assert!((area(balanced.all_polygons()) - area(first.all_polygons())).abs() < 1e-9);
    }
}
