use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

/// A 2D vector with f32 components.
///
/// Used throughout the engine for positions, velocities, axes and impulses.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[repr(C)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    /// Zero vector (0, 0)
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Unit vector along X axis (1, 0)
    pub const X: Self = Self::new(1.0, 0.0);

    /// Unit vector along Y axis (0, 1)
    pub const Y: Self = Self::new(0.0, 1.0);

    /// One vector (1, 1)
    pub const ONE: Self = Self::new(1.0, 1.0);

    /// Creates a new Vec2 from components
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Creates a Vec2 with both components set to the same value
    #[inline]
    pub const fn splat(v: f32) -> Self {
        Self::new(v, v)
    }

    /// Dot product of two vectors
    #[inline]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// 2D cross product (z component of the 3D cross of the embedded vectors)
    #[inline]
    pub fn cross(self, other: Self) -> f32 {
        self.x * other.y - self.y * other.x
    }

    /// Counter-clockwise perpendicular: (-y, x).
    ///
    /// For a CCW-wound polygon edge this points outward when applied to the
    /// reversed edge direction, inward otherwise.
    #[inline]
    pub fn perp(self) -> Self {
        Self::new(-self.y, self.x)
    }

    /// Vector triple product (a × b) × c expanded into 2D:
    /// `b · (c·a) − a · (c·b)`. Used by the GJK simplex walk.
    #[inline]
    pub fn triple_product(a: Self, b: Self, c: Self) -> Self {
        b * c.dot(a) - a * c.dot(b)
    }

    /// Squared length of the vector (avoids sqrt)
    #[inline]
    pub fn length_squared(self) -> f32 {
        self.dot(self)
    }

    /// Length (magnitude) of the vector
    #[inline]
    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Squared distance between two points
    #[inline]
    pub fn distance_squared(self, other: Self) -> f32 {
        (other - self).length_squared()
    }

    /// Returns a normalized (unit length) version of the vector.
    /// Returns the zero vector if the input is zero or near-zero.
    #[inline]
    pub fn normalize(self) -> Self {
        let len_sq = self.length_squared();
        if len_sq > 1e-12 {
            self / len_sq.sqrt()
        } else {
            Self::ZERO
        }
    }

    /// Attempts to normalize, returning None if the vector is too small
    #[inline]
    pub fn try_normalize(self) -> Option<Self> {
        let len_sq = self.length_squared();
        if len_sq > 1e-12 {
            Some(self / len_sq.sqrt())
        } else {
            None
        }
    }

    /// Returns true if the vector is approximately zero
    #[inline]
    pub fn is_near_zero(self, epsilon: f32) -> bool {
        self.length_squared() < epsilon * epsilon
    }

    /// Returns true if the vector has approximately unit length
    #[inline]
    pub fn is_normalized(self) -> bool {
        (self.length_squared() - 1.0).abs() < 1e-4
    }
}

impl Add for Vec2 {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Vec2 {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Vec2 {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Neg for Vec2 {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Mul<Vec2> for f32 {
    type Output = Vec2;
    #[inline]
    fn mul(self, rhs: Vec2) -> Vec2 {
        rhs * self
    }
}

impl MulAssign<f32> for Vec2 {
    #[inline]
    fn mul_assign(&mut self, rhs: f32) {
        *self = *self * rhs;
    }
}

impl Div<f32> for Vec2 {
    type Output = Self;
    #[inline]
    fn div(self, rhs: f32) -> Self {
        Self::new(self.x / rhs, self.y / rhs)
    }
}

impl DivAssign<f32> for Vec2 {
    #[inline]
    fn div_assign(&mut self, rhs: f32) {
        *self = *self / rhs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_dot_and_cross() {
        let a = Vec2::new(1.0, 2.0);
        let b = Vec2::new(3.0, 4.0);

        assert_relative_eq!(a.dot(b), 11.0);
        assert_relative_eq!(a.cross(b), -2.0);
        assert_relative_eq!(Vec2::X.cross(Vec2::Y), 1.0);
    }

    #[test]
    fn test_perp_is_quarter_turn() {
        let p = Vec2::X.perp();
        assert_relative_eq!(p.x, 0.0);
        assert_relative_eq!(p.y, 1.0);
        assert_relative_eq!(Vec2::new(3.0, -2.0).dot(Vec2::new(3.0, -2.0).perp()), 0.0);
    }

    #[test]
    fn test_normalize() {
        let v = Vec2::new(3.0, 4.0).normalize();
        assert_relative_eq!(v.length(), 1.0, epsilon = 1e-6);
        assert_eq!(Vec2::ZERO.normalize(), Vec2::ZERO);
        assert!(Vec2::ZERO.try_normalize().is_none());
    }

    #[test]
    fn test_triple_product_points_toward_target() {
        // Normal of segment AB in the direction of the origin
        let a = Vec2::new(1.0, 1.0);
        let b = Vec2::new(2.0, 1.0);
        let ab = b - a;
        let n = Vec2::triple_product(ab, -a, ab);
        assert!(n.dot(-a) > 0.0);
    }
}
