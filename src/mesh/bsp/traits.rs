//! Splitting-plane selection strategies.

use crate::float_types::Real;
use crate::mesh::plane::{BACK, COPLANAR, FRONT};
use crate::mesh::polygon::Polygon;

/// Picks which polygon of a (non-empty) list supplies a node's splitting plane.
///
/// Returning an index rather than a plane guarantees progress: the chosen
/// polygon is stored at the node whole and never re-split against itself.
pub trait SplittingPlaneStrategy<S: Clone> {
    fn pick_splitting_polygon(&self, polygons: &[Polygon<S>], epsilon: Real) -> usize;
}

/// Always the first remaining polygon. Cheap and deterministic; the output
/// tessellation depends on input order.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FirstPolygon;

impl<S: Clone> SplittingPlaneStrategy<S> for FirstPolygon {
    fn pick_splitting_polygon(&self, _polygons: &[Polygon<S>], _epsilon: Real) -> usize {
        0
    }
}

/// Scores a sample of candidate planes by how many polygons they would
/// split and how lopsided the front/back partition would be.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BalancedSplittingStrategy {
    pub span_weight: Real,
    pub balance_weight: Real,
    pub sample_size: usize,
}

impl Default for BalancedSplittingStrategy {
    fn default() -> Self {
        Self {
            span_weight: 8.0,
            balance_weight: 1.0,
            sample_size: 20,
        }
    }
}

impl<S: Clone> SplittingPlaneStrategy<S> for BalancedSplittingStrategy {
    fn pick_splitting_polygon(&self, polygons: &[Polygon<S>], epsilon: Real) -> usize {
        let mut best = 0;
        let mut best_score = Real::MAX;

        for (index, candidate) in polygons.iter().enumerate().take(self.sample_size.max(1)) {
            let plane = &candidate.plane;
            let (num_front, num_back, num_spanning) = polygons
                .iter()
                .map(|poly| match plane.classify_polygon(poly, epsilon) {
                    COPLANAR => (0_i64, 0_i64, 0_i64),
                    FRONT => (1, 0, 0),
                    BACK => (0, 1, 0),
                    _ => (0, 0, 1),
                })
                .fold((0, 0, 0), |acc, x| (acc.0 + x.0, acc.1 + x.1, acc.2 + x.2));

            let score = self.span_weight * num_spanning as Real
                + self.balance_weight * ((num_front - num_back) as Real).abs();

            if score < best_score {
                best_score = score;
                best = index;
            }
        }

        best
    }
}

/// Strategy selector carried by [`CsgOptions`](crate::boolean::CsgOptions).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum PlaneSelection {
    #[default]
    First,
    Balanced(BalancedSplittingStrategy),
}

impl<S: Clone> SplittingPlaneStrategy<S> for PlaneSelection {
    fn pick_splitting_polygon(&self, polygons: &[Polygon<S>], epsilon: Real) -> usize {
        match self {
            PlaneSelection::First => FirstPolygon.pick_splitting_polygon(polygons, epsilon),
            PlaneSelection::Balanced(strategy) => {
                strategy.pick_splitting_polygon(polygons, epsilon)
            },
        }
    }
}
