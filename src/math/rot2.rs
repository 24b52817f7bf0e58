use std::ops::Mul;

use super::vec2::Vec2;

/// A 2×2 rotation matrix stored as its two column vectors.
///
/// Always orthonormal when built through [`Rot2::from_angle`] or by
/// composing rotations, so the transpose is the inverse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rot2 {
    /// First column (image of the X axis)
    pub x_axis: Vec2,
    /// Second column (image of the Y axis)
    pub y_axis: Vec2,
}

impl Default for Rot2 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Rot2 {
    /// Identity rotation
    pub const IDENTITY: Self = Self {
        x_axis: Vec2::X,
        y_axis: Vec2::Y,
    };

    /// Creates a rotation of `angle` radians (counter-clockwise)
    #[inline]
    pub fn from_angle(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self {
            x_axis: Vec2::new(c, s),
            y_axis: Vec2::new(-s, c),
        }
    }

    /// Returns the rotation angle in radians
    #[inline]
    pub fn angle(&self) -> f32 {
        self.x_axis.y.atan2(self.x_axis.x)
    }

    /// Transpose; for a rotation matrix this is the inverse
    #[inline]
    pub fn transpose(&self) -> Self {
        Self {
            x_axis: Vec2::new(self.x_axis.x, self.y_axis.x),
            y_axis: Vec2::new(self.x_axis.y, self.y_axis.y),
        }
    }

    /// Inverse rotation (alias for [`Rot2::transpose`])
    #[inline]
    pub fn inverse(&self) -> Self {
        self.transpose()
    }

    /// Composes this rotation with an additional `angle` radians
    #[inline]
    pub fn rotated_by(&self, angle: f32) -> Self {
        *self * Self::from_angle(angle)
    }
}

impl Mul<Vec2> for Rot2 {
    type Output = Vec2;
    #[inline]
    fn mul(self, v: Vec2) -> Vec2 {
        self.x_axis * v.x + self.y_axis * v.y
    }
}

impl Mul for Rot2 {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self {
            x_axis: self * rhs.x_axis,
            y_axis: self * rhs.y_axis,
        }
    }
}
