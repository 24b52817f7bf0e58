use rustc_hash::FxHashMap;

use super::{BodyBounds, BroadPhase};
use crate::collision::{BodyHandle, ContactPair};
use crate::geometry::{Aabb, Circle};

/// A cheap per-body volume kept in sync with the body's transform.
pub trait VolumeShape: Copy {
    fn from_bounds(bounds: &BodyBounds) -> Self;
    fn overlaps(&self, other: &Self) -> bool;
    fn label() -> &'static str;
}

impl VolumeShape for Circle {
    fn from_bounds(bounds: &BodyBounds) -> Self {
        bounds.circle
    }

    fn overlaps(&self, other: &Self) -> bool {
        self.intersects(*other)
    }

    fn label() -> &'static str {
        "bounding volume (circle)"
    }
}

impl VolumeShape for Aabb {
    fn from_bounds(bounds: &BodyBounds) -> Self {
        bounds.aabb
    }

    fn overlaps(&self, other: &Self) -> bool {
        self.intersects(*other)
    }

    fn label() -> &'static str {
        "bounding volume (AABB)"
    }
}

/// O(n²) pairwise test over per-body bounding volumes, refreshed on move.
#[derive(Debug, Default)]
pub struct BoundingVolume<S: VolumeShape> {
    volumes: FxHashMap<BodyHandle, S>,
    // Insertion order, so pair enumeration stays deterministic
    order: Vec<BodyHandle>,
}

/// Circle-against-circle variant
pub type CircleVolume = BoundingVolume<Circle>;
/// AABB-against-AABB variant
pub type AabbVolume = BoundingVolume<Aabb>;

impl<S: VolumeShape> BoundingVolume<S> {
    pub fn new() -> Self {
        Self {
            volumes: FxHashMap::default(),
            order: Vec::new(),
        }
    }
}

impl<S: VolumeShape> BroadPhase for BoundingVolume<S> {
    fn on_added(&mut self, handle: BodyHandle, bounds: &BodyBounds) {
        self.volumes.insert(handle, S::from_bounds(bounds));
        self.order.push(handle);
    }

    fn on_removed(&mut self, handle: BodyHandle, _bounds: &BodyBounds) {
        self.volumes.remove(&handle);
        self.order.retain(|&h| h != handle);
    }

    fn on_updated(&mut self, handle: BodyHandle, bounds: &BodyBounds) {
        if let Some(volume) = self.volumes.get_mut(&handle) {
            *volume = S::from_bounds(bounds);
        }
    }

    fn candidate_pairs(&mut self, pairs: &mut Vec<ContactPair>) {
        for i in 0..self.order.len() {
            let a = self.order[i];
            let va = self.volumes[&a];
            for &b in &self.order[i + 1..] {
                if va.overlaps(&self.volumes[&b]) {
                    pairs.push(ContactPair::new(a, b));
                }
            }
        }
    }

    fn name(&self) -> &'static str {
        S::label()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec2;

    fn bounds_at(x: f32, half_extent: f32) -> BodyBounds {
        let center = Vec2::new(x, 0.0);
        BodyBounds {
            aabb: Aabb::new(
                center - Vec2::splat(half_extent),
                center + Vec2::splat(half_extent),
            ),
            circle: Circle::new(center, half_extent * std::f32::consts::SQRT_2),
        }
    }

    #[test]
    fn test_circle_volume_filters_far_pairs() {
        let mut bp = CircleVolume::new();
        bp.on_added(BodyHandle::new(0), &bounds_at(0.0, 0.5));
        bp.on_added(BodyHandle::new(1), &bounds_at(1.0, 0.5));
        bp.on_added(BodyHandle::new(2), &bounds_at(10.0, 0.5));

        let mut pairs = Vec::new();
        bp.candidate_pairs(&mut pairs);
        assert_eq!(pairs.len(), 1);
        assert_eq!(
            pairs[0],
            ContactPair::new(BodyHandle::new(0), BodyHandle::new(1))
        );
    }

    #[test]
    fn test_update_refreshes_volume() {
        let mut bp = AabbVolume::new();
        bp.on_added(BodyHandle::new(0), &bounds_at(0.0, 0.5));
        bp.on_added(BodyHandle::new(1), &bounds_at(10.0, 0.5));

        let mut pairs = Vec::new();
        bp.candidate_pairs(&mut pairs);
        assert!(pairs.is_empty());

        bp.on_updated(BodyHandle::new(1), &bounds_at(0.5, 0.5));
        bp.candidate_pairs(&mut pairs);
        assert_eq!(pairs.len(), 1);
    }
}
