//! Candidate-pair generation.
//!
//! Six interchangeable strategies sit behind the [`BroadPhase`] trait. Each
//! maintains whatever derived structure it needs from the add/remove/update
//! hooks and answers [`BroadPhase::candidate_pairs`] with a superset of the
//! truly overlapping pairs: false positives are allowed, false negatives
//! are not.

mod aabb_tree;
mod bounding_volume;
mod brute;
mod grid;
mod quad_tree;
mod sweep_prune;

pub use aabb_tree::AabbTree;
pub use bounding_volume::{AabbVolume, BoundingVolume, CircleVolume, VolumeShape};
pub use brute::BruteForce;
pub use grid::SpatialGrid;
pub use quad_tree::QuadTree;
pub use sweep_prune::SweepAndPrune;

use crate::collision::{BodyHandle, ContactPair};
use crate::geometry::{Aabb, Circle};
use crate::math::Vec2;

/// World-space bounds of a body, handed to the broad phase by the world
/// whenever a body is added or has moved.
#[derive(Debug, Clone, Copy)]
pub struct BodyBounds {
    /// Tight AABB of the body's world points
    pub aabb: Aabb,
    /// Position-centered bounding circle
    pub circle: Circle,
}

/// A broad-phase strategy.
///
/// The world notifies the strategy of every body mutation after applying
/// it; strategies store handles only, never body references, and are free
/// to keep any derived structure between queries.
pub trait BroadPhase {
    /// Registers a body. Called once per body, before any update.
    fn on_added(&mut self, handle: BodyHandle, bounds: &BodyBounds);

    /// Unregisters a body.
    fn on_removed(&mut self, handle: BodyHandle, bounds: &BodyBounds);

    /// Tells the strategy that a registered body's transform changed.
    fn on_updated(&mut self, handle: BodyHandle, bounds: &BodyBounds);

    /// Appends every candidate pair to `pairs`.
    fn candidate_pairs(&mut self, pairs: &mut Vec<ContactPair>);

    /// Strategy name for diagnostics
    fn name(&self) -> &'static str;
}

/// Extent of the quad tree's fixed world, in units from the origin
const QUAD_TREE_EXTENT: f32 = 40.0;
/// Subdivision depth of the quad tree
const QUAD_TREE_DEPTH: u8 = 5;
/// Cell size of the spatial hash grid
const GRID_CELL_SIZE: f32 = 2.0;

/// The closed set of broad-phase strategies, cycled at runtime by the
/// world's strategy switcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BroadPhaseKind {
    BruteForce,
    BoundingVolume,
    Grid,
    SweepAndPrune,
    AabbTree,
    QuadTree,
}

impl BroadPhaseKind {
    /// Every strategy, in switcher order
    pub const ALL: [BroadPhaseKind; 6] = [
        BroadPhaseKind::BruteForce,
        BroadPhaseKind::BoundingVolume,
        BroadPhaseKind::Grid,
        BroadPhaseKind::SweepAndPrune,
        BroadPhaseKind::AabbTree,
        BroadPhaseKind::QuadTree,
    ];

    /// The strategy after this one, wrapping around
    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|&k| k == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    /// The strategy before this one, wrapping around
    pub fn previous(self) -> Self {
        let i = Self::ALL.iter().position(|&k| k == self).unwrap_or(0);
        Self::ALL[(i + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Builds a fresh, empty instance of this strategy
    pub fn make(self) -> Box<dyn BroadPhase> {
        match self {
            BroadPhaseKind::BruteForce => Box::new(BruteForce::new()),
            BroadPhaseKind::BoundingVolume => Box::new(CircleVolume::new()),
            BroadPhaseKind::Grid => Box::new(SpatialGrid::new(GRID_CELL_SIZE)),
            BroadPhaseKind::SweepAndPrune => Box::new(SweepAndPrune::new()),
            BroadPhaseKind::AabbTree => Box::new(AabbTree::new()),
            BroadPhaseKind::QuadTree => Box::new(QuadTree::new(
                Aabb::new(
                    Vec2::splat(-QUAD_TREE_EXTENT),
                    Vec2::splat(QUAD_TREE_EXTENT),
                ),
                QUAD_TREE_DEPTH,
            )),
        }
    }
}

impl Default for BroadPhaseKind {
    fn default() -> Self {
        BroadPhaseKind::BruteForce
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_cycling_wraps() {
        let mut kind = BroadPhaseKind::BruteForce;
        for _ in 0..BroadPhaseKind::ALL.len() {
            kind = kind.next();
        }
        assert_eq!(kind, BroadPhaseKind::BruteForce);
        assert_eq!(
            BroadPhaseKind::BruteForce.previous(),
            BroadPhaseKind::QuadTree
        );
    }
}
