use super::{BodyBounds, BroadPhase};
use crate::collision::{BodyHandle, ContactPair};
use crate::geometry::Aabb;

#[derive(Debug, Clone, Copy)]
struct Entry {
    handle: BodyHandle,
    aabb: Aabb,
}

/// Sweep-and-prune over a single axis.
///
/// Entries are sorted by AABB minimum on x at query time, then swept with
/// an active-interval list: an interval leaves the list once its maximum
/// has been passed. Intervals overlapping on x are confirmed on y before
/// being reported, which only removes pairs that cannot collide.
#[derive(Debug, Default)]
pub struct SweepAndPrune {
    entries: Vec<Entry>,
}

impl SweepAndPrune {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BroadPhase for SweepAndPrune {
    fn on_added(&mut self, handle: BodyHandle, bounds: &BodyBounds) {
        self.entries.push(Entry {
            handle,
            aabb: bounds.aabb,
        });
    }

    fn on_removed(&mut self, handle: BodyHandle, _bounds: &BodyBounds) {
        self.entries.retain(|e| e.handle != handle);
    }

    fn on_updated(&mut self, handle: BodyHandle, bounds: &BodyBounds) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.handle == handle) {
            entry.aabb = bounds.aabb;
        }
    }

    fn candidate_pairs(&mut self, pairs: &mut Vec<ContactPair>) {
        self.entries
            .sort_by(|a, b| a.aabb.min.x.total_cmp(&b.aabb.min.x));

        let mut active: Vec<Entry> = Vec::new();
        for &entry in &self.entries {
            active.retain(|open| {
                if entry.aabb.min.x > open.aabb.max.x {
                    return false;
                }
                if entry.aabb.min.y < open.aabb.max.y && entry.aabb.max.y > open.aabb.min.y {
                    pairs.push(ContactPair::new(entry.handle, open.handle));
                }
                true
            });
            active.push(entry);
        }
    }

    fn name(&self) -> &'static str {
        "sweep and prune"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Circle;
    use crate::math::Vec2;

    fn bounds(min: Vec2, max: Vec2) -> BodyBounds {
        BodyBounds {
            aabb: Aabb::new(min, max),
            circle: Circle::new((min + max) * 0.5, (max - min).length() * 0.5),
        }
    }

    #[test]
    fn test_reports_x_and_y_overlaps_only() {
        let mut bp = SweepAndPrune::new();
        // 0 and 1 overlap; 2 overlaps 0 on x but not y; 3 is far away
        bp.on_added(
            BodyHandle::new(0),
            &bounds(Vec2::ZERO, Vec2::new(2.0, 2.0)),
        );
        bp.on_added(
            BodyHandle::new(1),
            &bounds(Vec2::new(1.0, 1.0), Vec2::new(3.0, 3.0)),
        );
        bp.on_added(
            BodyHandle::new(2),
            &bounds(Vec2::new(0.5, 5.0), Vec2::new(1.5, 6.0)),
        );
        bp.on_added(
            BodyHandle::new(3),
            &bounds(Vec2::new(10.0, 0.0), Vec2::new(11.0, 1.0)),
        );

        let mut pairs = Vec::new();
        bp.candidate_pairs(&mut pairs);
        assert_eq!(pairs.len(), 1);
        assert_eq!(
            pairs[0],
            ContactPair::new(BodyHandle::new(0), BodyHandle::new(1))
        );
    }

    #[test]
    fn test_update_moves_interval() {
        let mut bp = SweepAndPrune::new();
        bp.on_added(
            BodyHandle::new(0),
            &bounds(Vec2::ZERO, Vec2::new(1.0, 1.0)),
        );
        bp.on_added(
            BodyHandle::new(1),
            &bounds(Vec2::new(5.0, 0.0), Vec2::new(6.0, 1.0)),
        );

        let mut pairs = Vec::new();
        bp.candidate_pairs(&mut pairs);
        assert!(pairs.is_empty());

        bp.on_updated(
            BodyHandle::new(1),
            &bounds(Vec2::new(0.5, 0.5), Vec2::new(1.5, 1.5)),
        );
        bp.candidate_pairs(&mut pairs);
        assert_eq!(pairs.len(), 1);
    }
}
