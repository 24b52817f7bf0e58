use crate::math::Vec2;

/// An axis-aligned bounding box defined by its min and max corners.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Aabb {
    /// Minimum corner
    pub min: Vec2,
    /// Maximum corner
    pub max: Vec2,
}

impl Aabb {
    /// Creates an AABB from min and max corners
    #[inline]
    pub const fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Creates an AABB from two arbitrary corner points
    pub fn from_corners(p1: Vec2, p2: Vec2) -> Self {
        Self {
            min: Vec2::new(p1.x.min(p2.x), p1.y.min(p2.y)),
            max: Vec2::new(p1.x.max(p2.x), p1.y.max(p2.y)),
        }
    }

    /// Computes the tight AABB of a point set.
    ///
    /// # Panics
    /// Panics if `points` is empty.
    pub fn from_points(points: &[Vec2]) -> Self {
        assert!(!points.is_empty(), "AABB of an empty point set");
        let mut aabb = Self::new(points[0], points[0]);
        for &p in &points[1..] {
            aabb.grow_to_contain(p);
        }
        aabb
    }

    /// Enlarges the box to contain `p`
    #[inline]
    pub fn grow_to_contain(&mut self, p: Vec2) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }

    /// Returns true when the interiors overlap (touching edges do not count)
    #[inline]
    pub fn intersects(&self, other: Aabb) -> bool {
        self.max.x > other.min.x
            && self.min.x < other.max.x
            && self.max.y > other.min.y
            && self.min.y < other.max.y
    }

    /// Returns true when `other` lies entirely inside this box
    #[inline]
    pub fn contains_aabb(&self, other: Aabb) -> bool {
        self.min.x <= other.min.x
            && self.min.y <= other.min.y
            && self.max.x >= other.max.x
            && self.max.y >= other.max.y
    }

    /// Smallest AABB containing both boxes
    #[inline]
    pub fn union(&self, other: Aabb) -> Self {
        Self {
            min: Vec2::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Vec2::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }

    /// Returns a copy grown by `margin` on every side
    #[inline]
    pub fn expand(&self, margin: f32) -> Self {
        Self {
            min: self.min - Vec2::splat(margin),
            max: self.max + Vec2::splat(margin),
        }
    }

    /// Returns a copy translated by `offset`
    #[inline]
    pub fn translate(&self, offset: Vec2) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Surface area (in 2D, the enclosed area)
    #[inline]
    pub fn area(&self) -> f32 {
        (self.max.x - self.min.x) * (self.max.y - self.min.y)
    }

    /// Center point
    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }
}
