//! Pluggable choice of the splitting plane used when a node is built

use crate::float_types::Real;
use crate::mesh::plane::{BACK, COPLANAR, FRONT, Plane};
use crate::mesh::polygon::Polygon;

/// Trait for picking the splitting plane of a node that has none yet
pub trait SplittingPlaneStrategy<S: Clone> {
    /// Pick a splitting plane from a non-empty set of polygons
    fn pick_splitting_plane(&self, polygons: &[Polygon<S>]) -> Plane;
}

/// Default strategy: the plane of the first polygon in insertion order.
///
/// Cheap and deterministic. Tree shape, and with it the tessellation of boolean
/// results, follows the order polygons were handed in; high polygon counts can
/// produce deep, unbalanced trees.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstPolygonStrategy;

impl<S: Clone> SplittingPlaneStrategy<S> for FirstPolygonStrategy {
    fn pick_splitting_plane(&self, polygons: &[Polygon<S>]) -> Plane {
        polygons[0].plane.clone()
    }
}

/// Balanced heuristic: among a sample of candidate planes, pick the one that
/// minimises `span_weight * spanning + balance_weight * |front - back|`.
#[derive(Debug, Clone, Copy)]
pub struct BalancedSplittingStrategy {
    pub span_weight: Real,
    pub balance_weight: Real,
    /// Number of leading polygons tried as candidates
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
    fn pick_splitting_plane(&self, polygons: &[Polygon<S>]) -> Plane {
        let mut best_plane = &polygons[0].plane;
        let mut best_score = Real::MAX;

        for candidate in polygons.iter().take(self.sample_size.max(1)) {
            let plane = &candidate.plane;
            let (num_front, num_back, num_spanning) = polygons
                .iter()
                .map(|poly| match plane.classify_polygon(poly) {
                    COPLANAR => (0, 0, 0),
                    FRONT => (1, 0, 0),
                    BACK => (0, 1, 0),
                    _ => (0, 0, 1),
                })
                .fold((0i64, 0i64, 0i64), |acc, x| {
                    (acc.0 + x.0, acc.1 + x.1, acc.2 + x.2)
                });

            let score = self.span_weight * num_spanning as Real
                + self.balance_weight * ((num_front - num_back) as Real).abs();

            if score < best_score {
                best_score = score;
                best_plane = plane;
            }
        }

        best_plane.clone()
    }
}
