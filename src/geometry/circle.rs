use crate::math::Vec2;

/// A circle used as a cheap bounding volume.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    /// Creates a circle from center and radius
    #[inline]
    pub const fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Smallest center-anchored circle enclosing a local-space point set.
    ///
    /// The center is the given anchor (typically the body origin); the
    /// radius is the distance to the farthest point.
    pub fn enclosing(center: Vec2, points: &[Vec2]) -> Self {
        let mut radius_sq = 0.0f32;
        for &p in points {
            radius_sq = radius_sq.max(center.distance_squared(p));
        }
        Self {
            center,
            radius: radius_sq.sqrt(),
        }
    }

    /// Returns true when the two circles overlap
    #[inline]
    pub fn intersects(&self, other: Circle) -> bool {
        let radius_sum = self.radius + other.radius;
        self.center.distance_squared(other.center) < radius_sum * radius_sum
    }
}
